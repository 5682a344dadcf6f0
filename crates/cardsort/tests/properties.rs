//! Property tests over generated templates and move sequences.

use proptest::prelude::*;

use cardsort::{
    compute_checksum, export_template, import_template, verify_checksum, verify_result_binding,
};
use cardsort_testkit::{fixtures, generators, verify_all_vectors, MoveOp};

#[test]
fn golden_vectors_hold() {
    let failures = verify_all_vectors();
    assert!(failures.is_empty(), "failing vectors: {failures:?}");
}

proptest! {
    #[test]
    fn checksum_is_deterministic_over_generated_templates(tmpl in generators::template()) {
        let a = compute_checksum(&tmpl).unwrap();
        let b = compute_checksum(&tmpl).unwrap();
        prop_assert_eq!(&a, &b);
        prop_assert!(verify_checksum(&tmpl, &a));
    }

    #[test]
    fn export_import_round_trip_preserves_checksum(tmpl in generators::template()) {
        let checksum = compute_checksum(&tmpl).unwrap();
        let loaded = import_template(&export_template(&tmpl).unwrap()).unwrap();
        prop_assert_eq!(loaded.template, tmpl);
        prop_assert_eq!(loaded.checksum.to_hex(), checksum);
    }

    #[test]
    fn any_move_sequence_yields_a_bound_result(
        ops in generators::move_sequence(4, 2, 25)
    ) {
        let template = fixtures::template(2, 4, fixtures::relaxed_settings());
        let mut engine = import_template(&export_template(&template).unwrap())
            .unwrap()
            .start_session()
            .unwrap();

        for MoveOp { card, category, mark_unsure } in &ops {
            let target = category.map(fixtures::category_id);
            engine
                .move_card(&fixtures::card_id(*card), target.as_ref(), *mark_unsure)
                .unwrap();
        }

        // The gate is off, so a result exists after any sequence, and it
        // stays bound to the original template content.
        let result = engine
            .generate_result("Alice", &fixtures::sample_env())
            .unwrap();
        prop_assert_eq!(result.telemetry.moves_count, ops.len() as u64);
        prop_assert!(verify_result_binding(&result, &template));

        // Every card is accounted for exactly once across the output.
        let mut seen: Vec<_> = result
            .output
            .groups
            .iter()
            .flat_map(|g| g.card_ids_in_order.iter().cloned())
            .chain(result.output.unsure_card_ids.iter().cloned())
            .collect();
        prop_assert!(seen.len() <= 4);
        seen.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        seen.dedup();
        prop_assert_eq!(seen.len(), engine.progress().unwrap().0);
    }
}
