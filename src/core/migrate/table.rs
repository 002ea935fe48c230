//! The insights-pipeline-lib v2 → v3 replacement table.

use serde::Serialize;

/// One `old → new` substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Replacement {
    pub old: &'static str,
    pub new: &'static str,
}

const fn r(old: &'static str, new: &'static str) -> Replacement {
    Replacement { old, new }
}

/// Ordered list of substitutions, applied cumulatively to every line.
///
/// Order is the only precedence rule: each entry sees the output of every
/// entry before it.
#[derive(Debug, Clone, Copy)]
pub struct ReplacementTable {
    entries: &'static [Replacement],
}

impl ReplacementTable {
    pub const fn new(entries: &'static [Replacement]) -> Self {
        Self { entries }
    }

    /// The table shipped with the tool.
    pub const fn v3() -> Self {
        Self::new(V3_REPLACEMENTS)
    }

    pub fn entries(&self) -> &'static [Replacement] {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Apply every entry in order to `line`.
    ///
    /// Returns `None` when no key occurs, so callers can pass the original
    /// line through untouched.
    pub fn apply(&self, line: &str) -> Option<String> {
        let mut current: Option<String> = None;

        for entry in self.entries {
            let text = current.as_deref().unwrap_or(line);
            if text.contains(entry.old) {
                current = Some(text.replace(entry.old, entry.new));
            }
        }

        current
    }
}

// Call forms (`withStatusContext.lint(`) sit ahead of their bare forms, and
// `getFilesChanged` ahead of `changedFiles`, so no entry's output is
// rewritten again by a later entry.
static V3_REPLACEMENTS: &[Replacement] = &[
    r("cancelPriorBuilds", "pipelineUtils.cancelPriorBuilds"),
    r("getFilesChanged", "gitUtils.getFilesChanged"),
    r("changedFiles", "gitUtils.getFilesChanged"),
    r("checkCoverage", "pythonUtils.checkCoverage"),
    r("checkOutRepo", "gitUtils.checkOutRepo"),
    r("deployHelpers", "deployUtils"),
    r("deployServiceSet", "deployUtils.deployServiceSet"),
    r("deploymentPipeline", "execDeployPipeline"),
    r("ghNotify", "gitUtils.ghNotify"),
    r("openShift", "openShiftUtils"),
    r("pipelineVars.defaultUICloud", "pipelineVars.upshiftCloud"),
    r("pipelineVars.defaultUINameSpace", "pipelineVars.upshiftNameSpace"),
    r("pipfileComment.post", "pythonUtils.postPipfileComment"),
    r("pipfileComment.removeAll", "pythonUtils.removePipfileComments"),
    r("promoteImages", "deployUtils.promoteImages"),
    r("runBundleInstall", "rubyUtils.runBundleInstall"),
    r("runIfMasterOrPullReq", "pipelineUtils.runIfMasterOrPullReq"),
    r("runParallel", "pipelineUtils.runParallel"),
    r("runPipenvInstall", "pythonUtils.runPipenvInstall"),
    r("runPythonLintCheck", "pythonUtils.runLintCheck"),
    r("runSmokeTest", "execSmokeTest"),
    r("slackNotify", "slack.sendMsg"),
    r("stageWithContext", "gitUtils.stageWithContext"),
    r("triggeredByComment", "pipelineUtils.triggeredByComment"),
    r("waitForDeployment", "deployUtils.waitForDeployment"),
    r("withStatusContext.lint(", "gitUtils.withStatusContext(\"lint\", "),
    r("withStatusContext.unitTest(", "gitUtils.withStatusContext(\"unittest\", "),
    r(
        "withStatusContext.integrationTest(",
        "gitUtils.withStatusContext(\"integrationtest\", ",
    ),
    r("withStatusContext.coverage(", "gitUtils.withStatusContext(\"coverage\", "),
    r("withStatusContext.pipInstall(", "gitUtils.withStatusContext(\"pipinstall\", "),
    r(
        "withStatusContext.bundleInstall(",
        "gitUtils.withStatusContext(\"bundleinstall\", ",
    ),
    r("withStatusContext.swagger(", "gitUtils.withStatusContext(\"swagger\", "),
    r("withStatusContext.smoke(", "gitUtils.withStatusContext(\"smoke\", "),
    r("withStatusContext.dbMigrate(", "gitUtils.withStatusContext(\"dbmigrate\", "),
    r("withStatusContext.artifacts(", "gitUtils.withStatusContext(\"artifacts\", "),
    r(
        "withStatusContext.waitForFrontend(",
        "gitUtils.withStatusContext(\"waitforfrontend\", ",
    ),
    r("withStatusContext.custom(", "gitUtils.withStatusContext("),
    r("withStatusContext.lint", "gitUtils.withStatusContext(\"lint\")"),
    r("withStatusContext.unitTest", "gitUtils.withStatusContext(\"unittest\")"),
    r(
        "withStatusContext.integrationTest",
        "gitUtils.withStatusContext(\"integrationtest\")",
    ),
    r("withStatusContext.coverage", "gitUtils.withStatusContext(\"coverage\")"),
    r("withStatusContext.pipInstall", "gitUtils.withStatusContext(\"pipinstall\")"),
    r(
        "withStatusContext.bundleInstall",
        "gitUtils.withStatusContext(\"bundleinstall\")",
    ),
    r("withStatusContext.swagger", "gitUtils.withStatusContext(\"swagger\")"),
    r("withStatusContext.smoke", "gitUtils.withStatusContext(\"smoke\")"),
    r("withStatusContext.dbMigrate", "gitUtils.withStatusContext(\"dbmigrate\")"),
    r("withStatusContext.artifacts", "gitUtils.withStatusContext(\"artifacts\")"),
    r(
        "withStatusContext.waitForFrontend",
        "gitUtils.withStatusContext(\"waitforfrontend\")",
    ),
    r(
        "@Library(\"github.com/RedHatInsights/insights-pipeline-lib\")",
        "@Library(\"github.com/RedHatInsights/insights-pipeline-lib@v3\")",
    ),
    // Maps to itself: the line is reported as changed but its text stays.
    r(
        "@Library('github.com/RedHatInsights/insights-pipeline-lib')",
        "@Library('github.com/RedHatInsights/insights-pipeline-lib')",
    ),
];
