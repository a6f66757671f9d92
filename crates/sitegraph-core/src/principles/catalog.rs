//! Built-in construction principle catalog.
//!
//! Seeds every [`PrinciplesEngine`](super::PrinciplesEngine). Importance is
//! fixed at authoring time; only confidence moves afterwards, driven by user
//! feedback.

use super::engine::{ConstructionPrinciple, PrincipleCategory};

/// The fixed starting catalog, spanning all seven categories.
pub fn builtin_principles() -> Vec<ConstructionPrinciple> {
    use PrincipleCategory::*;

    vec![
        ConstructionPrinciple::new(
            "seq_foundation_before_framing",
            "Foundation before framing",
            Sequencing,
            "Structural framing can only begin on a completed, cured foundation",
            10,
            0.95,
        )
        .with_conditions(&["foundation", "framing"])
        .with_examples(&["Framing crew booked for day 2 of a 7-day cure was sent home"]),
        ConstructionPrinciple::new(
            "seq_frame_before_rough_in",
            "Frame before rough-in",
            Sequencing,
            "Electrical, plumbing and HVAC rough-in need finished wall and floor framing",
            9,
            0.9,
        )
        .with_conditions(&["framing", "electrical", "plumbing", "hvac"]),
        ConstructionPrinciple::new(
            "seq_rough_in_before_drywall",
            "Rough-in before drywall",
            Sequencing,
            "Closing walls before rough-in is signed off forces demolition rework",
            9,
            0.9,
        )
        .with_conditions(&["electrical", "plumbing", "insulation", "drywall"])
        .with_exceptions(&["Access panels can stay open for late low-voltage runs"]),
        ConstructionPrinciple::new(
            "seq_drywall_before_paint",
            "Drywall before paint",
            Sequencing,
            "Paint needs finished, sanded drywall surfaces",
            7,
            0.85,
        )
        .with_conditions(&["drywall", "painting"]),
        ConstructionPrinciple::new(
            "safety_no_work_below_overhead",
            "No trades below overhead work",
            Safety,
            "Roofing and demolition drop material; other trades stay clear of the zone",
            10,
            0.95,
        )
        .with_conditions(&["roofing", "demolition"])
        .with_examples(&["Siding crew pulled while tear-off was in progress overhead"]),
        ConstructionPrinciple::new(
            "safety_demolition_isolation",
            "Demolition runs alone",
            Safety,
            "Demolition shares the site with no other scheduled trade",
            10,
            0.9,
        )
        .with_conditions(&["demolition"]),
        ConstructionPrinciple::new(
            "quality_concrete_cure",
            "Let concrete cure before loading",
            Quality,
            "Loading concrete before design strength causes cracking and callbacks",
            9,
            0.9,
        )
        .with_conditions(&["foundation", "concrete pour", "framing"])
        .with_exceptions(&["High-early-strength mixes shorten the wait"]),
        ConstructionPrinciple::new(
            "quality_drywall_dry_before_paint",
            "Joint compound dries before paint",
            Quality,
            "Painting over wet compound traps moisture and flashes through the finish",
            6,
            0.85,
        )
        .with_conditions(&["drywall", "painting"]),
        ConstructionPrinciple::new(
            "eff_group_trade_visits",
            "Group visits per trade",
            Efficiency,
            "Consecutive scheduling per trade avoids repeated mobilization cost",
            4,
            0.7,
        )
        .with_conditions(&["electrical", "plumbing", "painting"]),
        ConstructionPrinciple::new(
            "comp_inspect_before_cover",
            "Inspect before covering work",
            Compliance,
            "Work that will be concealed needs its inspection recorded before cover-up",
            8,
            0.9,
        )
        .with_conditions(&["inspection", "insulation", "drywall"]),
        ConstructionPrinciple::new(
            "res_one_crew_one_site",
            "One crew, one site",
            Resource,
            "A crew booked on overlapping events will slip at least one of them",
            5,
            0.8,
        )
        .with_conditions(&["framing", "drywall", "painting"]),
        ConstructionPrinciple::new(
            "env_weather_window_exterior",
            "Weather window for exterior work",
            Environmental,
            "Exterior trades need a workable forecast for the full duration",
            6,
            0.8,
        )
        .with_conditions(&["roofing", "painting", "landscaping", "excavation"]),
    ]
}
