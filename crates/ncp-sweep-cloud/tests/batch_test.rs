mod common;

use common::*;
use ncp_sweep_cloud::{
    BatchRunner, FilterSet, Operation, PreparedAccount, ProgressLog, ResourceFilter, ResourceKind,
    RootAccount, RunOptions, SubAccountAction, SubAccountUpdate, TeardownTimings,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn deactivate_with_cleanup() -> RunOptions {
    let mut options = RunOptions::new(SubAccountAction::Deactivate);
    options.cleanup = true;
    options.timings = TeardownTimings::none();
    options
}

#[tokio::test]
async fn test_cleanup_runs_before_deactivation() {
    let timeline = Timeline::default();
    let factory = FakeFactory::new().with(
        "lab-01",
        FakeProvider::new(&timeline)
            .with(acg("web", false))
            .with_sub_accounts(vec![sub_account("7", "student01", true)]),
    );
    let accounts = vec![RootAccount::new("lab-01", "ak", "sk")];
    let runner = BatchRunner::new(factory, deactivate_with_cleanup())
        .with_clock(Arc::new(RecordingClock::new(&timeline)));

    let log = ProgressLog::new();
    let summary = runner.run(&accounts, &log).await;

    assert_eq!(timeline.operations().len(), 1);
    assert_eq!(summary.accounts.len(), 1);
    let outcome = &summary.accounts[0];
    assert_eq!(outcome.teardown.map(|t| t.succeeded), Some(1));
    assert_eq!(outcome.sub_accounts.succeeded, 1);
    assert!(outcome.skipped.is_none());

    let lines = log.lines();
    let teardown_at = lines.iter().position(|l| l.contains("✓ acg-web")).unwrap();
    let deactivate_at = lines
        .iter()
        .position(|l| l.contains("deactivated student01"))
        .unwrap();
    assert!(teardown_at < deactivate_at);
    assert!(lines.last().unwrap().starts_with("Done. 1 account(s)"));
}

#[tokio::test]
async fn test_unreachable_account_is_skipped() {
    let timeline = Timeline::default();
    let factory = FakeFactory::new().with(
        "good",
        FakeProvider::new(&timeline).with_sub_accounts(vec![sub_account("1", "a", true)]),
    );
    let accounts = vec![
        RootAccount::new("missing", "ak", "sk"),
        RootAccount::new("good", "ak", "sk"),
    ];
    let runner = BatchRunner::new(factory, RunOptions::new(SubAccountAction::Deactivate));

    let log = ProgressLog::new();
    let summary = runner.run(&accounts, &log).await;

    assert_eq!(summary.accounts.len(), 2);
    assert!(summary.accounts[0].skipped.is_some());
    assert_eq!(summary.accounts[1].sub_accounts.succeeded, 1);
    assert_eq!(summary.skipped_accounts(), 1);
}

#[tokio::test]
async fn test_sub_account_listing_failure_skips_account() {
    let timeline = Timeline::default();
    let factory = FakeFactory::new()
        .with("broken", FakeProvider::new(&timeline).fail_sub_account_listing())
        .with(
            "fine",
            FakeProvider::new(&timeline).with_sub_accounts(vec![sub_account("2", "b", true)]),
        );
    let accounts = vec![
        RootAccount::new("broken", "ak", "sk"),
        RootAccount::new("fine", "ak", "sk"),
    ];
    let runner = BatchRunner::new(factory, RunOptions::new(SubAccountAction::Deactivate));

    let log = ProgressLog::new();
    let summary = runner.run(&accounts, &log).await;

    assert!(summary.accounts[0].skipped.is_some());
    assert_eq!(summary.sub_account_total().succeeded, 1);
}

#[tokio::test]
async fn test_missing_target_login_contributes_nothing() {
    let timeline = Timeline::default();
    let factory = FakeFactory::new().with(
        "lab-02",
        FakeProvider::new(&timeline).with_sub_accounts(vec![sub_account("1", "other", true)]),
    );
    let factory_provider = factory.provider("lab-02");
    let accounts = vec![RootAccount::new("lab-02", "ak", "sk").with_target("student02")];
    let runner = BatchRunner::new(factory, RunOptions::new(SubAccountAction::Deactivate));

    let log = ProgressLog::new();
    let summary = runner.run(&accounts, &log).await;

    let outcome = &summary.accounts[0];
    assert_eq!(outcome.sub_accounts.succeeded + outcome.sub_accounts.failed, 0);
    assert!(outcome.skipped.is_none());
    assert!(factory_provider.updates().is_empty());
    assert!(
        log.lines()
            .iter()
            .any(|l| l.contains("sub-account student02 not found"))
    );
}

#[tokio::test]
async fn test_row_target_overrides_run_login() {
    let timeline = Timeline::default();
    let factory = FakeFactory::new().with(
        "lab-03",
        FakeProvider::new(&timeline).with_sub_accounts(vec![
            sub_account("1", "row-user", true),
            sub_account("2", "run-user", true),
        ]),
    );
    let provider = factory.provider("lab-03");
    let accounts = vec![RootAccount::new("lab-03", "ak", "sk").with_target("row-user")];
    let mut options = RunOptions::new(SubAccountAction::Deactivate);
    options.login = Some("run-user".into());
    let runner = BatchRunner::new(factory, options);

    let log = ProgressLog::new();
    runner.run(&accounts, &log).await;

    assert_eq!(
        provider.updates(),
        vec![("1".to_string(), SubAccountUpdate::set_active(false))]
    );
}

#[tokio::test]
async fn test_cancellation_stops_before_next_account() {
    let timeline = Timeline::default();
    let cancel = CancellationToken::new();
    let factory = FakeFactory::new()
        .with(
            "first",
            FakeProvider::new(&timeline)
                .with(acg("a1", false))
                .with(acg("a2", false))
                .cancel_after(1, cancel.clone()),
        )
        .with(
            "second",
            FakeProvider::new(&timeline).with(acg("b1", false)),
        );
    let accounts = vec![
        RootAccount::new("first", "ak", "sk"),
        RootAccount::new("second", "ak", "sk"),
    ];
    let runner = BatchRunner::new(factory, deactivate_with_cleanup())
        .with_clock(Arc::new(RecordingClock::new(&timeline)))
        .with_cancellation(cancel);

    let log = ProgressLog::new();
    let summary = runner.run(&accounts, &log).await;

    assert!(summary.cancelled);
    assert_eq!(summary.accounts.len(), 1);
    assert_eq!(
        timeline.operations(),
        vec![Operation::Delete {
            kind: ncp_sweep_cloud::ResourceKind::AccessControlGroup,
            id: "a1".into()
        }]
    );
    assert!(summary.summary_line().ends_with("(cancelled)"));
}

#[tokio::test]
async fn test_dry_run_touches_nothing() {
    let timeline = Timeline::default();
    let factory = FakeFactory::new().with(
        "lab-04",
        FakeProvider::new(&timeline)
            .with(server("s1", "RUN"))
            .with_sub_accounts(vec![sub_account("1", "student", true)]),
    );
    let provider = factory.provider("lab-04");
    let mut options = deactivate_with_cleanup();
    options.dry_run = true;
    let runner = BatchRunner::new(factory, options)
        .with_clock(Arc::new(RecordingClock::new(&timeline)));

    let log = ProgressLog::new();
    let summary = runner.run(&[RootAccount::new("lab-04", "ak", "sk")], &log).await;

    assert!(timeline.events().is_empty());
    assert!(provider.updates().is_empty());
    assert_eq!(summary.teardown_total().attempts(), 0);
}

#[tokio::test]
async fn test_prepared_run_collects_each_account_once() {
    let timeline = Timeline::default();
    let factory = FakeFactory::new()
        .with(
            "lab-01",
            FakeProvider::new(&timeline)
                .with(acg("web", false))
                .with_sub_accounts(vec![sub_account("1", "student01", true)]),
        )
        .with("lab-02", FakeProvider::new(&timeline).with(load_balancer("lb1")));
    let first = factory.provider("lab-01");
    let second = factory.provider("lab-02");
    let accounts = vec![
        RootAccount::new("lab-01", "ak", "sk"),
        RootAccount::new("lab-02", "ak", "sk"),
    ];
    let runner = BatchRunner::new(factory, deactivate_with_cleanup())
        .with_clock(Arc::new(RecordingClock::new(&timeline)));

    let mut prepared = Vec::new();
    for account in &accounts {
        prepared.push(runner.prepare(account).await.unwrap());
    }
    let summary = runner.run_prepared(&prepared, &ProgressLog::new()).await;

    assert_eq!(first.list_calls(), ResourceKind::ALL.to_vec());
    assert_eq!(second.list_calls(), ResourceKind::ALL.to_vec());
    assert_eq!(summary.teardown_total().succeeded, 2);
    assert_eq!(summary.sub_account_total().succeeded, 1);
}

#[tokio::test]
async fn test_prepared_run_deletes_only_the_reviewed_inventory() {
    let timeline = Timeline::default();
    let factory = FakeFactory::new().with(
        "lab-01",
        FakeProvider::new(&timeline)
            .with(acg("reviewed", false))
            .with(acg("created-later", false)),
    );
    let provider = factory.provider("lab-01");
    let runner = BatchRunner::new(factory, deactivate_with_cleanup())
        .with_clock(Arc::new(RecordingClock::new(&timeline)));

    let mut reviewed = PreparedAccount::empty(RootAccount::new("lab-01", "ak", "sk"));
    reviewed.inventory.push(acg("reviewed", false));
    let summary = runner.run_prepared(&[reviewed], &ProgressLog::new()).await;

    assert!(provider.list_calls().is_empty());
    assert_eq!(
        timeline.operations(),
        vec![Operation::Delete {
            kind: ResourceKind::AccessControlGroup,
            id: "reviewed".to_string(),
        }]
    );
    assert_eq!(summary.accounts[0].teardown.map(|t| t.succeeded), Some(1));
}

#[tokio::test]
async fn test_prepare_applies_run_filters() {
    let timeline = Timeline::default();
    let factory = FakeFactory::new().with(
        "lab-01",
        FakeProvider::new(&timeline)
            .with(acg("keep", false))
            .with(acg("drop", false))
            .fail_list(ResourceKind::Vpc),
    );
    let mut options = deactivate_with_cleanup();
    options.filters = Some(FilterSet::new().with(
        ResourceKind::AccessControlGroup,
        ResourceFilter::default().include(["acg-keep"]),
    ));
    let runner = BatchRunner::new(factory, options);

    let prepared = runner
        .prepare(&RootAccount::new("lab-01", "ak", "sk"))
        .await
        .unwrap();

    let kept: Vec<_> = prepared
        .inventory
        .get(ResourceKind::AccessControlGroup)
        .iter()
        .map(|r| r.id().to_string())
        .collect();
    assert_eq!(kept, vec!["keep"]);
    assert_eq!(prepared.collection_errors.len(), 1);
    assert_eq!(prepared.collection_errors[0].kind, ResourceKind::Vpc);
}

#[tokio::test]
async fn test_prepare_reports_connect_failure() {
    let runner = BatchRunner::new(FakeFactory::new(), deactivate_with_cleanup());
    let err = runner
        .prepare(&RootAccount::new("nobody", "ak", "sk"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("no credentials for nobody"));
}
