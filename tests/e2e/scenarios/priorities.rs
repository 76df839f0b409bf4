use crate::harness::{Assertion, Scenario};
use attn_core::Workspace;

#[test]
fn test_report_includes_manual_and_file_facets() {
    Scenario::new("report_includes_manual_and_file_facets")
        .writes_attributes(".", "[TechnicalDebt]\ncode_coverage=0.5\n")
        .writes_priorities(".", "[TechnicalDebt]\ncode_coverage=0.8\n")
        .writes("example.rb", b"puts 'example'")
        .syncs(".")
        .writes_priorities(
            ".",
            "[TechnicalDebt]\ncode_coverage=0.8\n\n[File:example.rb]\nreview_status=0.9\n",
        )
        .assert_resolved_attribute(".", "TechnicalDebt", "code_coverage", 0.5)
        .assert_resolved_attribute(".", "File:example.rb", "review_status", 0.0)
        .assert(Assertion::RankedItems(2))
        .assert_urgency_sorted()
        .assert_top_urgency("File:example.rb", "review_status")
        .run()
        .expect("scenario should pass");
}

#[test]
fn test_hierarchical_inheritance() {
    Scenario::new("hierarchical_inheritance")
        .from_fixture("example_project")
        .assert_resolved_attribute("services/events", "TechnicalDebt", "code_coverage", 0.2)
        .assert_resolved_attribute("services/events", "Operator", "event_processing_works", 0.0)
        .assert_resolved_priority("services/events", "TechnicalDebt", "code_coverage", 0.3)
        .assert_resolved_priority("services/events", "Operator", "event_processing_works", 1.0)
        .assert_resolved_attribute(".", "TechnicalDebt", "code_coverage", 0.5)
        .assert_resolved_lacks(".", "Operator")
        .assert_top_urgency("Operator", "event_processing_works")
        .run()
        .unwrap();
}

#[test]
fn test_subdirectories_inherit_manual_facets_only() {
    Scenario::new("subdirectories_inherit_manual_facets_only")
        .writes_attributes(".", "[TechnicalDebt]\ndocumentation=0.3\n")
        .writes("root.rb", b"puts 'root'")
        .syncs(".")
        .writes("subdir/sub.rb", b"puts 'sub'")
        .syncs("subdir")
        .assert_resolved_lacks("subdir", "File:root.rb")
        .assert_resolved_attribute("subdir", "File:sub.rb", "review_status", 0.0)
        .assert_resolved_attribute("subdir", "TechnicalDebt", "documentation", 0.3)
        .assert_resolved_attribute(".", "File:root.rb", "review_status", 0.0)
        .run()
        .unwrap();
}

#[test]
fn test_unprioritized_items_rank_last() {
    Scenario::new("unprioritized_items_rank_last")
        .writes_attributes(".", "[Security]\naudit=0.2\ninput_validation=0.9\n")
        .writes_priorities(".", "[Security]\ninput_validation=0.6\n")
        .assert(Assertion::RankedItems(2))
        .assert_top_urgency("Security", "input_validation")
        .assert(Assertion::Custom(Box::new(|ws: &Workspace| -> anyhow::Result<()> {
            let rankings = ws.rankings()?;
            let last = rankings
                .urgency
                .last()
                .ok_or_else(|| anyhow::anyhow!("empty ranking"))?;
            anyhow::ensure!(last.attribute == "audit", "audit should rank last");
            anyhow::ensure!(last.urgency == 0.0, "missing priority counts as 0.0");
            anyhow::ensure!(rankings.summary.low_urgency == 2, "both items are low urgency");
            Ok(())
        })))
        .run()
        .unwrap();
}
