use std::fs;

use git_buildinfo::cli::{ReleaseNotesArgs, Workflow};
use git_buildinfo::config::{Config, SummaryConfig};
use git_buildinfo::domain::{Issue, MergeRequest, MergeRequestDetail, State};
use git_buildinfo::forge::MockForge;
use git_buildinfo::release::ReleaseDecision;
use git_buildinfo::report::format_unreleased;
use git_buildinfo::vcs::MockVcs;
use serial_test::serial;

const DESCRIBE: &str = "describe --always --tags --long --match v[0-9]*.[0-9]*.[0-9]*";
const LOG: &str = "log --format=%H%x09%D%x09%s --max-count=100";

fn repository(describe: &str, branch: &str) -> MockVcs {
    MockVcs::new()
        .respond(DESCRIBE, describe)
        .respond("rev-parse --abbrev-ref HEAD", branch)
        .respond("rev-parse HEAD", "0123456789abcdef0123456789abcdef01234567")
        .respond("remote get-url origin", "https://github.com/org/widget")
}

fn merged(number: u64, hash: &str, title: &str) -> MergeRequest {
    MergeRequest {
        number,
        title: title.to_string(),
        url: format!("https://github.com/org/widget/pull/{}", number),
        state: State::Merged,
        merge_commit: Some(hash.to_string()),
        target_branch: "master".to_string(),
    }
}

#[test]
fn test_version_on_feature_branch() {
    let workflow = Workflow::new(
        Config::default(),
        repository("v0.6.0-3-g6ede8cd", "feature/x"),
        MockForge::new(),
    );
    assert_eq!(workflow.version().unwrap(), "v0.6.1-feature-x.3.g6ede8cd");
}

#[test]
fn test_info_block() {
    let workflow = Workflow::new(
        Config::default(),
        repository("v0.6.0-0-g0123456", "master"),
        MockForge::new(),
    );
    assert_eq!(
        workflow.info().unwrap(),
        "Module:  widget\nVersion: v0.6.0\nSource:  https://github.com/org/widget/tree/0123456789\n"
    );
}

#[test]
fn test_log_walks_reference() {
    let vcs = repository("v0.6.0-0-g0123456", "master").respond(
        "log --format=%H%x09%D%x09%s v0.5.0 --max-count=100",
        "aaa\ttag: v0.5.0\tRelease 0.5.0",
    );
    let workflow = Workflow::new(Config::default(), vcs, MockForge::new());

    let log = workflow.log(Some("v0.5.0")).unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].tags, vec!["v0.5.0".to_string()]);
}

#[test]
fn test_unreleased_report_end_to_end() {
    let vcs = repository("v1.2.0-3-gccc0000", "master").respond(
        LOG,
        "ccc\tHEAD -> master, origin/master\tMerge pull request #12 from org/parser\n\
         bbb\t\tFix typo\n\
         aaa\t\tMerge pull request #11 from org/docs\n\
         999\ttag: v1.2.0\tRelease 1.2.0\n\
         888\t\tMerge pull request #10 from org/old",
    );
    let mut forge = MockForge::new();
    forge.add_merge_request(merged(12, "ccc", "Faster parser"));
    forge.add_merge_request(merged(11, "aaa", "Docs"));
    forge.add_merge_request(merged(10, "888", "Old work"));
    forge.add_issue(Issue {
        number: 4,
        title: "Parser is slow".to_string(),
        url: "https://github.com/org/widget/issues/4".to_string(),
        state: State::Closed,
    });
    forge.set_detail(
        12,
        MergeRequestDetail {
            title: "Faster parser".to_string(),
            body: "Closes #4".to_string(),
            ..Default::default()
        },
    );
    forge.set_detail(11, MergeRequestDetail::default());

    let workflow = Workflow::new(Config::default(), vcs, forge);
    let changes = workflow.unreleased(None).unwrap();

    assert_eq!(changes.commits.len(), 3);
    assert_eq!(
        format_unreleased(&changes),
        "## Merge requests\n\n\
         - #12 Faster parser (closes #4)\n\
         - #11 Docs\n\
         \n## Issues\n\n\
         - #4 Parser is slow [closed]\n"
    );
}

#[test]
#[serial]
fn test_release_notes_without_release_records_summary() {
    let dir = tempfile::tempdir().unwrap();
    let notes = dir.path().join("RELEASES.md");
    fs::write(&notes, "# v0.7.0\n\n- Upcoming\n\n# v0.6.0\n\n- Shipped\n").unwrap();
    let summary = dir.path().join("summary.md");

    let env_name = "GIT_BUILDINFO_TEST_SUMMARY";
    std::env::set_var(env_name, &summary);
    std::env::remove_var("ENABLE_RELEASE_BUILD");

    let config = Config {
        release_notes: notes,
        output_dir: dir.path().join("out"),
        summary: SummaryConfig {
            env: env_name.to_string(),
        },
        ..Config::default()
    };
    let mut workflow = Workflow::new(
        config,
        repository("v0.6.0-2-g0123456", "master"),
        MockForge::new(),
    );

    let result = workflow
        .release_notes(&ReleaseNotesArgs::default())
        .unwrap();
    std::env::remove_var(env_name);

    assert!(matches!(result.decision, ReleaseDecision::Skip { .. }));
    assert_eq!(result.version, "v0.6.1-rc.2.g0123456");
    assert!(result.summary_recorded);

    // no section matches the intermediate version
    assert_eq!(fs::read_to_string(&result.path).unwrap(), "");

    let table = fs::read_to_string(&summary).unwrap();
    assert!(table.starts_with("| | |\n|-|-|\n| Module | `widget` |\n"));
    assert!(table.contains("| Version | `v0.6.1-rc.2.g0123456` |\n"));
}

#[test]
#[serial]
fn test_release_enabled_by_environment() {
    let dir = tempfile::tempdir().unwrap();
    let notes = dir.path().join("RELEASES.md");
    fs::write(&notes, "# v0.7.0\n- Upcoming\n").unwrap();

    std::env::set_var("ENABLE_RELEASE_BUILD", "yes");
    let config = Config {
        release_notes: notes,
        output_dir: dir.path().join("out"),
        summary: SummaryConfig {
            env: "GIT_BUILDINFO_TEST_NO_SUMMARY".to_string(),
        },
        ..Config::default()
    };
    let mut workflow = Workflow::new(
        config,
        repository("v0.6.0-2-g0123456", "master"),
        MockForge::new(),
    );
    workflow.build_info().facts().unwrap();
    workflow.build_info().vcs().set(DESCRIBE, "v0.7.0-0-g0123456");

    let result = workflow.release_notes(&ReleaseNotesArgs::default());
    std::env::remove_var("ENABLE_RELEASE_BUILD");
    let result = result.unwrap();

    assert_eq!(
        result.decision,
        ReleaseDecision::Cut {
            version: "v0.7.0".to_string()
        }
    );
    assert_eq!(result.version, "v0.7.0");
    assert_eq!(fs::read_to_string(&result.path).unwrap(), "- Upcoming\n");
}
