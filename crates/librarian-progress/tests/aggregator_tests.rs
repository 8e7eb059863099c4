use librarian_core::types::{FanoutKind, RequestNode, RequestState};
use librarian_progress::{index_label, is_index_fanout_subject, percentage, ProgressAggregator, ProgressCell, ProgressView};

fn leaf(subject: &str, done: u64, total: u64, final_total: bool) -> RequestNode {
    RequestNode::leaf(subject, RequestState::InProgress)
        .with_stage("fetching index")
        .with_parts(done, total, final_total)
}

#[test]
fn leaf_percentage_and_stage() {
    let view = ProgressAggregator::default().render(&leaf("fire", 1, 3, true));
    let ProgressView::Row(row) = &view else { panic!("expected a row, got {:?}", view) };
    assert_eq!(row.label, "fire");
    assert_eq!(row.stage, "fetching index");
    assert_eq!(row.progress, ProgressCell::Percent { value: 33, is_final: true });
}

#[test]
fn per_index_fanout_labels_children() {
    let tree = RequestNode::fanout(
        "q",
        RequestState::InProgress,
        Some(FanoutKind::PerIndex),
        vec![leaf("q%idx1", 5, 10, false), leaf("q%idx2", 5, 10, false)],
    );
    let view = ProgressAggregator::default().render(&tree);
    let ProgressView::Indexed(groups) = &view else { panic!("expected indexed view, got {:?}", view) };
    let labels: Vec<&str> = groups.iter().map(|g| g.index.as_str()).collect();
    assert_eq!(labels, vec!["idx1", "idx2"]);
    for g in groups {
        let ProgressView::Row(row) = &g.view else { panic!("expected row") };
        assert_eq!(row.progress, ProgressCell::Percent { value: 50, is_final: false });
    }
}

#[test]
fn untagged_fanout_inferred_from_subject() {
    let indexed = RequestNode::fanout(
        "q%idx1 idx2",
        RequestState::InProgress,
        None,
        vec![leaf("q%idx1", 1, 2, true), leaf("q%idx2", 1, 4, true)],
    );
    assert!(matches!(ProgressAggregator::default().render(&indexed), ProgressView::Indexed(_)));

    let plain = RequestNode::fanout("q", RequestState::InProgress, None, vec![leaf("a", 1, 2, true), leaf("b", 0, 0, false)]);
    let view = ProgressAggregator::default().render(&plain);
    let ProgressView::Flat(children) = &view else { panic!("expected flat view, got {:?}", view) };
    assert_eq!(children.len(), 2);
    let labels: Vec<&str> = view.rows().iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["a", "b"], "sibling order preserved");
}

#[test]
fn zero_total_and_terminal_states_are_indeterminate() {
    let agg = ProgressAggregator::default();
    let ProgressView::Row(row) = agg.render(&leaf("a", 0, 0, true)) else { panic!() };
    assert_eq!(row.progress, ProgressCell::Indeterminate);

    let done = RequestNode::leaf("b", RequestState::Finished).with_parts(10, 10, true);
    let ProgressView::Row(row) = agg.render(&done) else { panic!() };
    assert_eq!(row.progress, ProgressCell::Indeterminate);
    assert_eq!(row.stage, "FINISHED");
}

#[test]
fn error_leaf_renders_state_as_stage() {
    let tree = RequestNode::fanout(
        "q",
        RequestState::InProgress,
        Some(FanoutKind::Plain),
        vec![
            RequestNode::leaf("broken", RequestState::FinishedWithError).with_stage("stale stage").with_parts(3, 9, false),
            leaf("ok", 9, 9, true),
        ],
    );
    let view = ProgressAggregator::default().render(&tree);
    let rows = view.rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].stage, "FINISHED_WITH_ERROR");
    assert_eq!(rows[0].progress, ProgressCell::Indeterminate);
    assert_eq!(rows[1].progress.percent(), Some(100));
}

#[test]
fn queued_leaf_shows_state_not_stage() {
    let node = RequestNode::leaf("a", RequestState::Queued).with_stage("ignored").with_parts(1, 4, false);
    let ProgressView::Row(row) = ProgressAggregator::default().render(&node) else { panic!() };
    assert_eq!(row.stage, "QUEUED");
    assert_eq!(row.progress, ProgressCell::Percent { value: 25, is_final: false });
}

#[test]
fn percentage_is_bounded() {
    for total in 1..40u64 {
        for done in 0..=total {
            let p = percentage(done, total).expect("non-zero total");
            assert_eq!(u64::from(p), 100 * done / total);
        }
    }
    assert_eq!(percentage(12, 10), Some(100), "torn read clamps");
    assert_eq!(percentage(5, 0), None);
    assert_eq!(percentage(u64::MAX, u64::MAX), Some(100));
}

#[test]
fn depth_cap_truncates() {
    let mut node = leaf("bottom", 1, 2, true);
    for i in 0..5 {
        node = RequestNode::fanout(format!("level{}", i), RequestState::InProgress, Some(FanoutKind::Plain), vec![node]);
    }
    let view = ProgressAggregator::new(3).render(&node);
    assert!(view.rows().is_empty());
    assert!(view.render_text().contains("level1 | ..."));
    assert_eq!(ProgressAggregator::new(16).render(&node).rows().len(), 1);
}

#[test]
fn subject_helpers() {
    assert!(is_index_fanout_subject("fire%idx1 idx2"));
    assert!(is_index_fanout_subject("fire%idx1;idx2"));
    assert!(!is_index_fanout_subject("fire%idx1"));
    assert!(!is_index_fanout_subject("fire idx"));
    assert_eq!(index_label("fire%idx1"), "idx1");
    assert_eq!(index_label("plain"), "plain");
}

#[test]
fn text_rendering_and_json_shape() {
    let tree = RequestNode::fanout(
        "q",
        RequestState::InProgress,
        Some(FanoutKind::PerIndex),
        vec![leaf("q%idx1", 5, 10, false), leaf("q%idx2", 10, 10, true)],
    );
    let view = ProgressAggregator::default().render(&tree);
    let text = view.render_text();
    assert!(text.contains("[idx1]\n  q%idx1 | fetching index | ~50% (fetch length unknown)"));
    assert!(text.contains("q%idx2 | fetching index | 100%"));
    let json = serde_json::to_value(&view).expect("json");
    assert_eq!(json["kind"], "indexed");
    assert_eq!(json["items"][0]["index"], "idx1");
}

#[test]
fn unknown_state_renders_its_name() {
    let node = RequestNode::leaf("a", RequestState::Other("CANCELLING".into())).with_stage("ignored").with_parts(1, 2, true);
    let ProgressView::Row(row) = ProgressAggregator::default().render(&node) else { panic!() };
    assert_eq!(row.stage, "CANCELLING");
    assert_eq!(row.progress, ProgressCell::Percent { value: 50, is_final: true }, "unknown states count as running");
}
