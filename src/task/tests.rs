#[cfg(test)]
mod tests {
    use crate::task::filter::*;
    use crate::task::input::*;
    use crate::task::store::*;
    use crate::task::tree::*;
    use crate::task::types::*;
    use crate::task::validation::*;
    use crate::task::wire::*;
    use chrono::{Duration, TimeZone, Utc};
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    fn task(id: &str, order: i32) -> Task {
        Task::new(id, format!("Task {}", id), "work").with_display_order(order)
    }

    fn child(id: &str, parent: ParentTaskId, order: i32) -> Task {
        task(id, order).with_parent(parent)
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    fn flat_ids(forest: &[Task]) -> Vec<String> {
        flatten(forest).into_iter().map(|t| t.id.clone()).collect()
    }

    /// R(1) -> C(2) -> G(3), plus a second root S(4)
    fn sample_forest() -> Vec<Task> {
        vec![
            task("1", 0).with_sub_tasks(vec![
                child("2", 1, 0).with_sub_tasks(vec![child("3", 2, 0)]),
            ]),
            task("4", 1),
        ]
    }

    struct RecordingHandler {
        events: Arc<Mutex<Vec<StoreEvent>>>,
    }

    impl StoreEventHandler for RecordingHandler {
        fn handle_event(&self, event: &StoreEvent) -> anyhow::Result<()> {
            self.events.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    // ------------------------------------------------------------------
    // Tree algorithms
    // ------------------------------------------------------------------

    #[test]
    fn test_flatten_is_preorder_and_complete() {
        let forest = sample_forest();

        assert_eq!(flat_ids(&forest), vec!["1", "2", "3", "4"]);
        assert_eq!(flatten(&forest).len(), count_tasks(&forest));
        assert!(flatten(&[]).is_empty());
    }

    #[test]
    fn test_numeric_id_coercion() {
        assert!(matches_numeric_id("10", 10));
        assert!(!matches_numeric_id("010", 10));
        assert!(!matches_numeric_id("tmp-10", 10));

        let forest = vec![task("010", 0), task("10", 1)];
        assert_eq!(find_by_numeric_id(&forest, 10).map(|t| t.id.as_str()), Some("10"));
    }

    #[test]
    fn test_update_task_tree_keeps_existing_children() {
        let forest = sample_forest();

        let updated = update_task_tree(
            &forest,
            |t| t.id == "2",
            |t| {
                let mut next = t.shallow_clone();
                next.text = "renamed".to_string();
                next.sub_tasks = None;
                next
            },
        );

        let node = find_task(&updated, "2").unwrap();
        assert_eq!(node.text, "renamed");
        assert_eq!(ids(node.children()), vec!["3"]);
        // Input forest untouched
        assert_eq!(find_task(&forest, "2").unwrap().text, "Task 2");
    }

    #[test]
    fn test_remove_from_tree_drops_subtree() {
        let forest = sample_forest();

        let pruned = remove_from_tree(&forest, "2");

        assert_eq!(flat_ids(&pruned), vec!["1", "4"]);
        assert!(pruned[0].children().is_empty());
        assert_eq!(remove_from_tree(&forest, "missing"), forest);
    }

    #[test]
    fn test_extract_node_carries_children() {
        let forest = sample_forest();

        let (rest, node) = extract_node(&forest, "2");
        let node = node.unwrap();

        assert_eq!(ids(node.children()), vec!["3"]);
        assert_eq!(flat_ids(&rest), vec!["1", "4"]);

        let (unchanged, none) = extract_node(&forest, "99");
        assert!(none.is_none());
        assert_eq!(unchanged, forest);
    }

    #[test]
    fn test_insert_under_parent_sorts_siblings() {
        let forest = vec![task("1", 0).with_sub_tasks(vec![child("2", 1, 0), child("3", 1, 5)])];

        let inserted = insert_under_parent(&forest, Some(1), child("4", 1, 2));

        assert_eq!(ids(inserted[0].children()), vec!["2", "4", "3"]);
    }

    #[test]
    fn test_insert_under_parent_into_unloaded_children() {
        let forest = vec![task("1", 0)];
        assert!(forest[0].sub_tasks.is_none());

        let inserted = insert_under_parent(&forest, Some(1), child("2", 1, 0));

        assert_eq!(ids(inserted[0].children()), vec!["2"]);
    }

    #[test]
    fn test_insert_under_parent_sorts_incoming_subtree() {
        let forest = vec![task("1", 0)];
        let node = child("2", 1, 0).with_sub_tasks(vec![child("3", 2, 5), child("4", 2, 1)]);

        let inserted = insert_under_parent(&forest, Some(1), node);

        assert_eq!(ids(inserted[0].children()[0].children()), vec!["4", "3"]);
    }

    #[test]
    fn test_prune_known_ids_drops_repeats_with_subtrees() {
        let mut seen: HashSet<String> = ["1".to_string()].into_iter().collect();
        let forest = vec![
            task("1", 0).with_sub_tasks(vec![child("5", 1, 0)]),
            task("2", 1).with_sub_tasks(vec![child("3", 2, 0)]),
            task("3", 2),
        ];

        let (kept, dropped) = prune_known_ids(&forest, &mut seen);

        assert_eq!(flat_ids(&kept), vec!["2", "3"]);
        assert_eq!(dropped, vec!["1", "3"]);
        assert!(seen.contains("2"));
    }

    #[test]
    fn test_insert_under_missing_parent_is_unchanged() {
        let forest = sample_forest();

        let result = insert_under_parent(&forest, Some(999), child("5", 999, 0));

        assert_eq!(result, forest);
    }

    #[test]
    fn test_insert_at_root_keeps_ties_stable() {
        let forest = vec![task("1", 0), task("2", 1)];

        let inserted = insert_under_parent(&forest, None, task("3", 0));

        assert_eq!(ids(&inserted), vec!["1", "3", "2"]);
    }

    #[test]
    fn test_sort_tree_by_display_order_every_level() {
        let forest = vec![
            task("1", 3).with_sub_tasks(vec![child("5", 1, 2), child("6", 1, 1)]),
            task("2", 1),
            task("3", 1),
        ];

        let sorted = sort_tree_by_display_order(&forest);

        assert_eq!(ids(&sorted), vec!["2", "3", "1"]);
        assert_eq!(ids(sorted[2].children()), vec!["6", "5"]);
    }

    #[test]
    fn test_validate_forest_reports_problems() {
        assert!(validate_forest(&sample_forest()).is_empty());

        let broken = vec![
            task("1", 5).with_sub_tasks(vec![child("2", 7, 0)]),
            task("1", 1),
        ];
        let issues = validate_forest(&broken);

        assert!(issues.iter().any(|i| i.contains("more than once")));
        assert!(issues.iter().any(|i| i.contains("not ascending in root list")));
        assert!(issues.iter().any(|i| i.contains("nested under 1")));
    }

    // ------------------------------------------------------------------
    // Store mutators
    // ------------------------------------------------------------------

    #[test]
    fn test_upsert_new_task_under_parent() {
        let mut store = TaskStore::new();
        store.upsert_task(task("10", 0));
        store.upsert_task(child("11", 10, 0));

        assert_eq!(ids(store.hierarchy()), vec!["10"]);
        assert_eq!(ids(store.hierarchy()[0].children()), vec!["11"]);
    }

    #[test]
    fn test_upsert_with_missing_parent_goes_to_root() {
        let mut store = TaskStore::with_hierarchy(vec![task("1", 0)]);

        store.upsert_task(child("2", 42, 1));

        assert_eq!(ids(store.hierarchy()), vec!["1", "2"]);
        assert_eq!(store.get_task_by_id("2").unwrap().parent_task_id, Some(42));
    }

    #[test]
    fn test_upsert_existing_is_idempotent() {
        let mut store = TaskStore::with_hierarchy(sample_forest());
        let replacement = child("2", 1, 0).with_completed(true);

        store.upsert_task(replacement.clone());
        let once = store.hierarchy().to_vec();
        store.upsert_task(replacement);

        assert_eq!(store.hierarchy(), once.as_slice());
        assert_eq!(count_tasks(store.hierarchy()), 4);
        let updated = store.get_task_by_id("2").unwrap();
        assert!(updated.completed);
        assert_eq!(ids(updated.children()), vec!["3"]);
    }

    #[test]
    fn test_upsert_existing_order_change_resorts() {
        let mut store = TaskStore::with_hierarchy(vec![task("1", 0), task("2", 1), task("3", 2)]);

        store.upsert_task(task("1", 5));

        assert_eq!(ids(store.hierarchy()), vec!["2", "3", "1"]);
        assert!(validate_forest(store.hierarchy()).is_empty());
    }

    #[test]
    fn test_remove_task_removes_subtree() {
        let mut store = TaskStore::with_hierarchy(vec![task("1", 0).with_sub_tasks(vec![
            child("2", 1, 0).with_sub_tasks(vec![child("3", 2, 0)]),
        ])]);

        store.remove_task("2");

        assert!(store.hierarchy()[0].children().is_empty());
        assert!(store.get_task_by_id("3").is_none());
        assert_eq!(store.get_flat_tasks().len(), 1);
    }

    #[test]
    fn test_unknown_id_mutators_leave_state_untouched() {
        let mut store = TaskStore::with_hierarchy(sample_forest());
        let before = store.hierarchy().to_vec();

        store.remove_task("99");
        store.toggle_complete_local("99");
        store.reorder_task_local("99", 3, None);

        assert_eq!(store.hierarchy(), before.as_slice());
        assert!(store.rollback_snapshot().is_none());
    }

    #[test]
    fn test_toggle_complete_local() {
        let mut store = TaskStore::with_hierarchy(sample_forest());

        store.toggle_complete_local("3");
        assert!(store.get_task_by_id("3").unwrap().completed);

        store.toggle_complete_local("3");
        assert!(!store.get_task_by_id("3").unwrap().completed);
        assert_eq!(flat_ids(store.hierarchy()), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_reorder_to_missing_parent_falls_back_to_root() {
        let mut store = TaskStore::with_hierarchy(vec![task("1", 0)]);

        store.reorder_task_local("1", 0, Some(999));

        assert_eq!(ids(store.hierarchy()), vec!["1"]);
        assert_eq!(store.hierarchy()[0].parent_task_id, Some(999));
    }

    #[test]
    fn test_reorder_end_to_end() {
        let mut store = TaskStore::new();
        store.upsert_task(task("10", 0));
        store.upsert_task(child("11", 10, 0));
        assert_eq!(ids(store.hierarchy()[0].children()), vec!["11"]);

        store.reorder_task_local("11", 5, Some(123));

        assert_eq!(ids(store.hierarchy()), vec!["10", "11"]);
        let moved = store.get_task_by_id("11").unwrap();
        assert_eq!(moved.display_order, 5);
        assert_eq!(moved.parent_task_id, Some(123));
        assert!(store.hierarchy()[0].children().is_empty());
    }

    #[test]
    fn test_reorder_within_siblings() {
        let mut store = TaskStore::with_hierarchy(vec![task("1", 0).with_sub_tasks(vec![
            child("2", 1, 0),
            child("3", 1, 1),
            child("4", 1, 2),
        ])]);

        store.reorder_task_local("2", 3, Some(1));

        assert_eq!(ids(store.hierarchy()[0].children()), vec!["3", "4", "2"]);
    }

    #[test]
    fn test_reorder_under_own_descendant_stays_acyclic() {
        let mut store = TaskStore::with_hierarchy(sample_forest());

        store.reorder_task_local("1", 0, Some(3));

        assert_eq!(count_tasks(store.hierarchy()), 4);
        let moved = store.get_task_by_id("1").unwrap();
        assert_eq!(moved.parent_task_id, Some(3));
        assert_eq!(ids(moved.children()), vec!["2"]);
        assert!(store.hierarchy().iter().any(|t| t.id == "1"));
    }

    #[test]
    fn test_sibling_order_holds_after_every_mutator() {
        let mut store = TaskStore::new();
        store.upsert_task(task("1", 3));
        store.upsert_task(task("2", 1));
        store.upsert_task(child("3", 1, 4));
        store.upsert_task(child("4", 1, 2));
        store.upsert_task(child("5", 1, 0));
        assert!(validate_forest(store.hierarchy()).is_empty());

        store.reorder_task_local("5", 9, Some(1));
        assert!(validate_forest(store.hierarchy()).is_empty());

        store.toggle_complete_local("4");
        store.remove_task("3");
        assert!(validate_forest(store.hierarchy()).is_empty());
        assert_eq!(ids(store.hierarchy()), vec!["2", "1"]);
        assert_eq!(ids(store.hierarchy()[1].children()), vec!["4", "5"]);

        store.upsert_task(
            child("6", 1, 7).with_sub_tasks(vec![child("7", 6, 5), child("8", 6, 1)]),
        );
        assert!(validate_forest(store.hierarchy()).is_empty());
        assert_eq!(ids(store.get_task_by_id("6").unwrap().children()), vec!["8", "7"]);
    }

    #[test]
    fn test_upsert_new_task_drops_nested_known_ids() {
        let mut store = TaskStore::with_hierarchy(vec![
            task("1", 0),
            task("3", 1).with_sub_tasks(vec![child("5", 3, 0)]),
        ]);

        store.upsert_task(task("2", 2).with_sub_tasks(vec![
            child("3", 2, 0).with_sub_tasks(vec![child("9", 3, 0)]),
            child("4", 2, 1),
        ]));

        assert!(validate_forest(store.hierarchy()).is_empty());
        assert_eq!(ids(store.get_task_by_id("2").unwrap().children()), vec!["4"]);
        // The existing copy keeps its place and children
        assert_eq!(ids(store.hierarchy()), vec!["1", "3", "2"]);
        assert_eq!(ids(store.get_task_by_id("3").unwrap().children()), vec!["5"]);
        assert!(store.get_task_by_id("9").is_none());
    }

    // ------------------------------------------------------------------
    // Snapshot, status and events
    // ------------------------------------------------------------------

    #[test]
    fn test_rollback_snapshot_holds_previous_forest() {
        let mut store = TaskStore::with_hierarchy(sample_forest());
        let original = store.hierarchy().to_vec();

        store.remove_task("4");
        assert_eq!(store.rollback_snapshot(), Some(original.as_slice()));

        let after_remove = store.hierarchy().to_vec();
        store.toggle_complete_local("1");
        assert_eq!(store.rollback_snapshot(), Some(after_remove.as_slice()));

        assert!(store.restore_rollback_snapshot());
        assert_eq!(store.hierarchy(), after_remove.as_slice());
        assert!(store.rollback_snapshot().is_none());
        assert!(!store.restore_rollback_snapshot());
    }

    #[test]
    fn test_set_hierarchy_leaves_snapshot_alone() {
        let mut store = TaskStore::with_hierarchy(sample_forest());
        store.toggle_complete_local("1");
        let snapshot = store.rollback_snapshot().map(|s| s.to_vec());

        store.set_hierarchy(vec![task("9", 0)]);

        assert_eq!(ids(store.hierarchy()), vec!["9"]);
        assert_eq!(store.rollback_snapshot().map(|s| s.to_vec()), snapshot);
    }

    #[test]
    fn test_error_and_loading_status() {
        let mut store = TaskStore::new();
        assert!(!store.loading());

        store.set_loading(true);
        store.set_error(Some("Network error".to_string()));
        assert!(store.loading());
        assert_eq!(store.error(), Some("Network error"));

        store.set_error(None);
        assert!(store.error().is_none());
        assert_eq!(store.last_error(), Some("Network error"));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut store = TaskStore::with_hierarchy(sample_forest());
        store.set_categories(vec!["work".to_string()]);
        store.set_error(Some("boom".to_string()));
        store.set_pending_mutation(Some("1".to_string()));
        store.remove_task("4");

        store.reset();

        assert!(store.hierarchy().is_empty());
        assert!(store.categories().is_empty());
        assert!(store.error().is_none());
        assert!(store.last_error().is_none());
        assert!(store.pending_mutation_id().is_none());
        assert!(store.rollback_snapshot().is_none());
        assert!(!store.loading());
    }

    #[test]
    fn test_event_handlers_see_mutations() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut store = TaskStore::new();
        store.add_event_handler(Box::new(RecordingHandler {
            events: Arc::clone(&events),
        }));

        store.upsert_task(child("2", 77, 0));
        store.toggle_complete_local("2");
        store.remove_task("missing");
        store.reset();

        let events = events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                StoreEvent::TaskInserted {
                    task_id: "2".to_string(),
                    parent_task_id: Some(77),
                    placed_at_root: true,
                },
                StoreEvent::CompletionToggled {
                    task_id: "2".to_string(),
                    completed: true,
                },
                StoreEvent::StoreReset,
            ]
        );
    }

    #[test]
    fn test_stores_are_independent() {
        let mut first = TaskStore::new();
        let second = TaskStore::new();

        first.upsert_task(task("1", 0));

        assert_eq!(first.get_flat_tasks().len(), 1);
        assert!(second.get_flat_tasks().is_empty());
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    fn filter_fixture() -> TaskStore {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        TaskStore::with_hierarchy(vec![
            Task::new("a", "Email Boss", "work")
                .with_widget("w1")
                .with_updated_at(base),
            Task::new("b", "Buy milk", "personal")
                .with_widget("w2")
                .with_completed(true)
                .with_updated_at(base + Duration::hours(1)),
        ])
    }

    fn filtered(store: &TaskStore, filter: TaskFilter) -> Vec<String> {
        store
            .get_filtered_tasks(&filter)
            .into_iter()
            .map(|t| t.id.clone())
            .collect()
    }

    #[test]
    fn test_filter_composition() {
        let store = filter_fixture();

        assert_eq!(filtered(&store, TaskFilter::new().widget("w1")), vec!["a"]);
        assert_eq!(filtered(&store, TaskFilter::new().category("personal")), vec!["b"]);
        assert_eq!(filtered(&store, TaskFilter::new().completed(true)), vec!["b"]);
        assert_eq!(filtered(&store, TaskFilter::new().search("milk")), vec!["b"]);
        assert_eq!(filtered(&store, TaskFilter::new().search("MILK")), vec!["b"]);
        assert!(filtered(&store, TaskFilter::new().widget("w1").completed(true)).is_empty());
    }

    #[test]
    fn test_filter_orders_newest_first() {
        let store = filter_fixture();

        assert_eq!(filtered(&store, TaskFilter::new()), vec!["b", "a"]);
        assert_eq!(filtered(&store, TaskFilter::new().search("")), vec!["b", "a"]);
        assert!(filtered(&store, TaskFilter::new().widget("")).is_empty());
    }

    #[test]
    fn test_filter_search_is_literal() {
        let store = TaskStore::with_hierarchy(vec![
            Task::new("1", "Fix (a+b)", "work"),
            Task::new("2", "Fix ab", "work").with_description("cleanup"),
        ]);

        assert_eq!(filtered(&store, TaskFilter::new().search("(a+b)")), vec!["1"]);
        assert_eq!(filtered(&store, TaskFilter::new().search("CLEAN")), vec!["2"]);
    }

    #[test]
    fn test_filter_includes_nested_tasks() {
        let store = TaskStore::with_hierarchy(vec![
            Task::new("1", "Trip", "travel").with_sub_tasks(vec![
                Task::new("2", "Book hotel", "travel").with_parent(1),
            ]),
        ]);

        assert_eq!(filtered(&store, TaskFilter::new().search("hotel")), vec!["2"]);
    }

    #[test]
    fn test_hierarchy_for_widget() {
        let store = TaskStore::with_hierarchy(vec![
            task("1", 0).with_widget("w1").with_sub_tasks(vec![child("2", 1, 0).with_widget("w2")]),
            task("3", 1).with_widget("w2"),
        ]);

        let w1: Vec<&str> = store.get_hierarchy_for_widget(Some("w1")).into_iter().map(|t| t.id.as_str()).collect();
        assert_eq!(w1, vec!["1"]);
        assert_eq!(store.get_hierarchy_for_widget(Some("w1"))[0].children().len(), 1);

        let w2: Vec<&str> = store.get_hierarchy_for_widget(Some("w2")).into_iter().map(|t| t.id.as_str()).collect();
        assert_eq!(w2, vec!["3"]);

        assert_eq!(store.get_hierarchy_for_widget(None).len(), 2);
        assert_eq!(store.get_hierarchy_for_widget(Some("")).len(), 2);
    }

    // ------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------

    #[test]
    fn test_validate_create() {
        let now = Utc::now();
        assert!(validate_create(&CreateTaskInput::new("Buy milk", "personal"), now).is_ok());

        let errors = validate_create(
            &CreateTaskInput::new("   ", "personal")
                .with_priority(11)
                .with_parent(0),
            now,
        )
        .unwrap_err();

        assert_eq!(
            errors,
            vec![
                ValidationError::Required { field: "Task text" },
                ValidationError::PriorityOutOfRange {
                    value: 11,
                    min: 0,
                    max: 10
                },
                ValidationError::NonPositiveId {
                    field: "Parent task ID"
                },
            ]
        );
    }

    #[test]
    fn test_validate_due_date_grace() {
        let now = Utc::now();
        let mut input = CreateTaskInput::new("Call", "personal");

        input.due_date = Some(now - Duration::seconds(30));
        assert!(validate_create(&input, now).is_ok());

        input.due_date = Some(now - Duration::minutes(5));
        assert_eq!(
            validate_create(&input, now).unwrap_err(),
            vec![ValidationError::DueDateInPast]
        );
    }

    #[test]
    fn test_validate_update_and_reorder() {
        let now = Utc::now();
        assert!(validate_update(&UpdateTaskInput::new(3).text("ok"), now).is_ok());
        assert!(validate_update(&UpdateTaskInput::new(0), now).is_err());
        assert!(validate_update(&UpdateTaskInput::new(3).display_order(-1), now).is_err());

        assert!(validate_reorder(&ReorderTaskInput::new(3, 0, Some(1))).is_ok());
        let errors = validate_reorder(&ReorderTaskInput::new(3, -2, Some(-1))).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(
            join_messages(&errors),
            "Display order must be non-negative; Parent task ID must be greater than 0"
        );
    }

    #[test]
    fn test_text_length_limit() {
        let long = "x".repeat(MAX_TEXT_LEN + 1);
        let errors = validate_create(&CreateTaskInput::new(long, "work"), Utc::now()).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::TooLong {
                field: "Task text",
                max: MAX_TEXT_LEN
            }]
        );
    }

    // ------------------------------------------------------------------
    // Wire codec
    // ------------------------------------------------------------------

    #[test]
    fn test_decode_offsetless_timestamps_as_utc() {
        let json = r#"[{
            "id": "10",
            "text": "Groceries",
            "category": "personal",
            "userId": "u1",
            "createdAt": "2024-03-01T09:30:00",
            "updatedAt": "2024-03-01T10:00:00.250Z",
            "displayOrder": 1,
            "subTasks": [{
                "id": "11",
                "text": "Buy milk",
                "category": "personal",
                "createdAt": "2024-03-01 09:31:00",
                "updatedAt": "2024-03-01T09:31:00+02:00",
                "parentTaskId": 10
            }]
        }]"#;

        let forest = decode_forest(json).unwrap();

        assert_eq!(
            forest[0].created_at,
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
        );
        let nested = &forest[0].children()[0];
        assert_eq!(nested.parent_task_id, Some(10));
        assert_eq!(nested.updated_at, Utc.with_ymd_and_hms(2024, 3, 1, 7, 31, 0).unwrap());
        assert!(nested.sub_tasks.is_none());
        assert!(!nested.completed);
    }

    #[test]
    fn test_decode_rejects_bad_timestamp() {
        let json = r#"[{"id":"1","text":"t","category":"c","createdAt":"yesterday","updatedAt":"2024-01-01T00:00:00Z"}]"#;

        match decode_forest(json) {
            Err(WireError::InvalidTimestamp { task_id, field, .. }) => {
                assert_eq!(task_id, "1");
                assert_eq!(field, "createdAt");
            }
            other => panic!("Expected InvalidTimestamp, got {:?}", other),
        }
    }

    #[test]
    fn test_encode_uses_camel_case() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let forest = vec![
            Task::new("1", "Root", "work")
                .with_updated_at(base)
                .with_sub_tasks(vec![Task::new("2", "Leaf", "work").with_parent(1)]),
        ];

        let json = encode_forest(&forest).unwrap();

        assert!(json.contains("\"parentTaskId\": 1"));
        assert!(json.contains("\"subTasks\""));
        assert!(json.contains("\"updatedAt\": \"2024-01-01T00:00:00.000Z\""));
        assert_eq!(flat_ids(&decode_forest(&json).unwrap()), vec!["1", "2"]);
    }
}
