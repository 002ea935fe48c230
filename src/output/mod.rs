mod response;

pub use response::{map_cmd_result_to_json, print_change, print_json_result, print_text_result};
