//! Final ordering of the merged tabs.

use crate::context::MergeContext;
use crate::error::RibbonError;
use crate::tab::{Tab, TabOrder};

/// Anchor of a tab placed relative to another one.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Anchor {
    target: String,
    before: bool,
}

/// Order tabs for display.
///
/// Tabs without an order keep their arrival index as position, tabs with a
/// numeric order are stably sorted by it. Tabs ordered by label are then
/// placed next to their target, several tabs sharing a target keeping their
/// arrival order. Tabs whose target never appears go last.
pub fn order_tabs(tabs: Vec<Tab>, ctx: &mut MergeContext) -> Vec<Tab> {
    let mut positioned: Vec<(i64, Tab)> = Vec::new();
    let mut pending: Vec<(Anchor, Tab)> = Vec::new();

    for (index, tab) in tabs.into_iter().enumerate() {
        match &tab.order {
            TabOrder::Position(position) => positioned.push((i64::from(*position), tab)),
            TabOrder::Unspecified => positioned.push((index as i64, tab)),
            TabOrder::Label(target) => {
                let anchor = Anchor {
                    target: target.clone(),
                    before: tab.order_before,
                };
                pending.push((anchor, tab));
            }
        }
    }

    positioned.sort_by_key(|(position, _)| *position);
    let mut placed: Vec<(Option<Anchor>, Tab)> =
        positioned.into_iter().map(|(_, tab)| (None, tab)).collect();

    // a tab may target one that is itself placed by label
    loop {
        let before = pending.len();
        let mut unresolved = Vec::new();

        for (anchor, tab) in pending {
            let Some(target) = placed.iter().position(|(_, t)| t.label.is_named(&anchor.target)) else {
                unresolved.push((anchor, tab));
                continue;
            };

            let at = if anchor.before {
                target
            } else {
                // skip tabs already placed after the same target
                let target_label = &placed[target].1.label;
                let mut at = target + 1;
                while placed.get(at).is_some_and(|(a, _)| {
                    a.as_ref()
                        .is_some_and(|a| !a.before && target_label.is_named(&a.target))
                }) {
                    at += 1;
                }
                at
            };
            tracing::debug!(tab = %tab.label, target = %anchor.target, before = anchor.before, "tab placed by label");
            placed.insert(at, (Some(anchor), tab));
        }

        pending = unresolved;
        if pending.is_empty() || pending.len() == before {
            break;
        }
    }

    for (anchor, tab) in pending {
        ctx.report(&RibbonError::UnresolvedTabOrder {
            tab: tab.label.to_string(),
            target: anchor.target,
            source_info: tab.source_info.clone(),
        });
        placed.push((None, tab));
    }

    placed.into_iter().map(|(_, tab)| tab).collect()
}
