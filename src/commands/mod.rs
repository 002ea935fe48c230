pub type CmdResult<T> = pipeline_migrate::Result<(T, i32)>;

pub mod migrate;
