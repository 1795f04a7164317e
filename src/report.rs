use std::fmt::{self, Write};

use crate::models::{CardKind, Profile};
use crate::session::Results;

/// Plain-text rendering of a results screen, used by the headless check.
pub fn render_text(profile: &Profile, results: &Results) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let bundle = &results.bundle;
    writeln!(
        out,
        "Your Recommendations ({}, {} items, generated {})",
        profile.goal.label(),
        bundle.card_count(),
        results.received_at.format("%H:%M:%S")
    )?;

    for kind in CardKind::ALL {
        writeln!(out, "\n{}", kind.heading())?;
        let mut empty = true;
        for card in bundle.cards().filter(|card| card.kind() == kind) {
            empty = false;
            let stats: Vec<String> = card
                .stats()
                .into_iter()
                .map(|stat| format!("{}: {}", stat.label, stat.value))
                .collect();
            writeln!(out, "• {}", card.title())?;
            writeln!(out, "  {}", card.description())?;
            writeln!(out, "  {}", stats.join(" | "))?;
        }
        if empty {
            writeln!(out, "  (none)")?;
        }
    }
    Ok(out)
}
