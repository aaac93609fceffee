use crate::credentialing::catalog::RuleCatalog;
use crate::credentialing::evaluation::{
    evaluate_document, HARD_RULE_MATCH_THRESHOLD, MAX_EVIDENCE_LINES, SOFT_RULE_MATCH_THRESHOLD,
};

const CORPUS: &[&str] = &[
    "",
    "   \n\n\t",
    "STATE MEDICAL BOARD LICENSE\nStatus: ACTIVE\nDEA Registration Schedule II-V\n\
     Controlled substance registration current",
    "Malpractice insurance policy\nLiability coverage $1M/$3M\nBackground check: clear\n\
     No criminal record, no sanction, no exclusion",
    "Diplomate, American Board of Internal Medicine\nBoard certified since 2012\n\
     CME credits: 52 hours\nHospital privileges at Mercy (medical staff)\nPeer reference letters: 3",
    "l1cense m3dical b0ard ~~ OCR noise ~~ \u{fffd}\u{fffd}",
    "İstanbul state license ΣΊΣΥΦΟΣ hospital",
];

#[test]
fn per_rule_invariants_hold_across_corpus() {
    let catalog = RuleCatalog::standard();

    for text in CORPUS {
        let report = evaluate_document(&catalog, text);
        let lowered = text.to_lowercase();

        for (rule, evaluation) in catalog.rules().zip(report.evaluations()) {
            assert_eq!(rule.id, evaluation.rule_id);
            assert!((0.0..=1.0).contains(&evaluation.match_ratio));
            assert!((0.0..=1.0).contains(&evaluation.confidence));
            assert!(evaluation.evidence.len() <= MAX_EVIDENCE_LINES);

            let mut remaining = rule.keywords.iter();
            for keyword in &evaluation.matched_keywords {
                assert!(lowered.contains(&keyword.to_lowercase()));
                assert!(
                    remaining.any(|candidate| candidate == keyword),
                    "matched keywords must be a subsequence of the rule's keywords"
                );
            }

            let threshold = if rule.mandatory {
                HARD_RULE_MATCH_THRESHOLD
            } else {
                SOFT_RULE_MATCH_THRESHOLD
            };
            assert_eq!(evaluation.compliant, evaluation.match_ratio >= threshold);

            let mut lines = text.lines();
            for cited in &evaluation.evidence {
                assert!(
                    lines.any(|line| line == cited),
                    "evidence must appear in original line order"
                );
            }
        }
    }
}

#[test]
fn overall_score_stays_within_bounds() {
    let catalog = RuleCatalog::standard();

    for text in CORPUS {
        let report = evaluate_document(&catalog, text);
        assert!(
            (0.0..=100.0).contains(&report.overall_score),
            "score {} out of range",
            report.overall_score
        );
    }
}

#[test]
fn evaluation_is_idempotent() {
    let catalog = RuleCatalog::standard();

    for text in CORPUS {
        let first = evaluate_document(&catalog, text);
        let second = evaluate_document(&catalog, text);

        assert_eq!(first, second);
        assert_eq!(
            first.overall_score.to_bits(),
            second.overall_score.to_bits()
        );
        assert_eq!(
            serde_json::to_string(&first).expect("serializes"),
            serde_json::to_string(&second).expect("serializes")
        );
    }
}

#[test]
fn catalog_can_be_shared_across_threads() {
    let catalog = std::sync::Arc::new(RuleCatalog::standard());
    let expected = evaluate_document(&catalog, CORPUS[4]);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let catalog = std::sync::Arc::clone(&catalog);
            std::thread::spawn(move || evaluate_document(&catalog, CORPUS[4]))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().expect("thread completes"), expected);
    }
}
