//! Full-session scenarios: template in, sorted result out.

use cardsort::{
    export_result, export_template, import_result, import_template, verify_result_binding,
    SessionError, SessionState, Sha256Checksum, SCHEMA_VERSION,
};
use cardsort_testkit::fixtures;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn two_categories_three_cards_full_session() {
    init_tracing();

    // requireAllCardsSorted = true, enableUnsureBucket = true
    let template = fixtures::template(2, 3, fixtures::strict_settings());
    let cat_a = fixtures::category_id(0);
    let cat_b = fixtures::category_id(1);
    let cards: Vec<_> = (0..3).map(fixtures::card_id).collect();

    let json = export_template(&template).expect("fixture template exports");
    let loaded = import_template(&json).expect("exported template re-imports");
    let mut engine = loaded.start_session().expect("session starts");

    engine.move_card(&cards[0], Some(&cat_a), false).unwrap();
    engine.move_card(&cards[1], Some(&cat_b), false).unwrap();
    engine.move_card(&cards[2], None, true).unwrap();

    let result = engine
        .generate_result("Alice", &fixtures::sample_env())
        .expect("all cards sorted, gate is open");

    assert_eq!(result.schema_version, SCHEMA_VERSION);
    assert_eq!(result.template_id, template.template_id);
    assert_eq!(result.participant.name, "Alice");

    assert_eq!(result.output.groups.len(), 2);
    assert_eq!(result.output.groups[0].category_id, cat_a);
    assert_eq!(result.output.groups[0].card_ids_in_order, vec![cards[0].clone()]);
    assert_eq!(result.output.groups[1].category_id, cat_b);
    assert_eq!(result.output.groups[1].card_ids_in_order, vec![cards[1].clone()]);
    assert_eq!(result.output.unsure_card_ids, vec![cards[2].clone()]);

    assert_eq!(result.telemetry.moves_count, 3);
    assert_eq!(result.telemetry.undo_count, 0);

    // The result is bound to the template content and exports cleanly
    assert!(verify_result_binding(&result, &template));
    let result_json = export_result(&result).expect("result validates and exports");
    assert_eq!(import_result(&result_json).unwrap(), result);
}

#[test]
fn completion_gate_blocks_then_opens() {
    init_tracing();

    let template = fixtures::template(1, 5, fixtures::strict_settings());
    let category = fixtures::category_id(0);
    let mut engine = import_template(&export_template(&template).unwrap())
        .unwrap()
        .start_session()
        .unwrap();

    for i in 0..4 {
        engine.move_card(&fixtures::card_id(i), Some(&category), false).unwrap();
    }
    assert!(!engine.can_export());
    assert_eq!(
        engine
            .generate_result("Alice", &fixtures::sample_env())
            .unwrap_err(),
        SessionError::SortIncomplete { unsorted: 1 }
    );

    // Unsure counts as sorted; the gate opens
    engine.move_card(&fixtures::card_id(4), None, true).unwrap();
    assert!(engine.can_export());
    let result = engine
        .generate_result("Alice", &fixtures::sample_env())
        .unwrap();
    assert_eq!(result.output.unsure_card_ids, vec![fixtures::card_id(4)]);
    assert_eq!(engine.state(), SessionState::Completed);
}

#[test]
fn save_progress_midway_then_finish() {
    init_tracing();

    let template = fixtures::template(1, 3, fixtures::strict_settings());
    let category = fixtures::category_id(0);
    let mut engine = import_template(&export_template(&template).unwrap())
        .unwrap()
        .start_session()
        .unwrap();

    engine.move_card(&fixtures::card_id(0), Some(&category), false).unwrap();

    // Partial save works with the gate still closed, and exports cleanly
    let partial = engine
        .save_progress("Alice", &fixtures::sample_env())
        .unwrap();
    assert_eq!(partial.output.groups[0].card_ids_in_order.len(), 1);
    assert!(export_result(&partial).is_ok());
    assert_eq!(engine.state(), SessionState::Sorting);

    engine.move_card(&fixtures::card_id(1), Some(&category), false).unwrap();
    engine.move_card(&fixtures::card_id(2), None, true).unwrap();
    let final_result = engine
        .generate_result("Alice", &fixtures::sample_env())
        .unwrap();

    // Both paths share one derivation and one checksum binding
    assert_eq!(
        partial.template_checksum_sha256,
        final_result.template_checksum_sha256
    );
    assert_eq!(final_result.telemetry.moves_count, 3);
}

#[test]
fn undo_and_reset_are_reflected_in_telemetry() {
    init_tracing();

    let template = fixtures::template(2, 3, fixtures::relaxed_settings());
    let cat_a = fixtures::category_id(0);
    let mut engine = import_template(&export_template(&template).unwrap())
        .unwrap()
        .start_session()
        .unwrap();

    engine.move_card(&fixtures::card_id(0), Some(&cat_a), false).unwrap();
    engine.move_card(&fixtures::card_id(1), Some(&cat_a), false).unwrap();
    engine.undo().unwrap();

    let result = engine
        .generate_result("Alice", &fixtures::sample_env())
        .unwrap();
    assert_eq!(result.telemetry.moves_count, 2);
    assert_eq!(result.telemetry.undo_count, 1);
    assert_eq!(
        result.output.groups[0].card_ids_in_order,
        vec![fixtures::card_id(0)]
    );

    // Reset reopens the session with zeroed counters
    engine.reset().unwrap();
    assert_eq!(engine.state(), SessionState::Sorting);
    assert_eq!(engine.moves_count(), 0);
    assert_eq!(engine.undo_count(), 0);
    assert_eq!(engine.progress().unwrap(), (0, 3));
}

#[test]
fn template_checksum_is_load_time_not_current_state() {
    init_tracing();

    let template = fixtures::template(1, 2, fixtures::relaxed_settings());
    let expected = Sha256Checksum::compute(&template).unwrap().to_hex();
    let mut engine = import_template(&export_template(&template).unwrap())
        .unwrap()
        .start_session()
        .unwrap();

    engine
        .move_card(&fixtures::card_id(0), Some(&fixtures::category_id(0)), false)
        .unwrap();
    let result = engine
        .generate_result("Alice", &fixtures::sample_env())
        .unwrap();

    assert_eq!(result.template_checksum_sha256, expected);
    assert!(result.session.duration_ms < 60_000, "derived from real clock");
}
