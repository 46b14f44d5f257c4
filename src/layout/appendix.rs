//! Appendix layout
//!
//! Lays out the transaction summary in a fixed section order:
//! 1. Uncategorized, always, even with nothing in it
//! 2. Category sections in the tree's first-insertion order
//! 3. Excluded Transactions, always last

use serde::Serialize;

use super::command::{DrawCommand, Font};
use super::cursor::RowKind;
use super::engine::PageLayoutEngine;
use crate::display::format_money;
use crate::models::{CategorySection, Money};
use crate::services::aggregation::Aggregation;

pub const APPENDIX_TITLE: &str = "APPENDIX: Summary of Transactions";
pub const UNCATEGORIZED_TITLE: &str = "Uncategorized";
pub const EXCLUDED_TITLE: &str = "Excluded Transactions";

const BAND_WIDTH: u8 = 30;
const BAND_LEFT: i32 = 55;
const BAND_RIGHT: i32 = 560;
const TOTAL_X: i32 = 400;
const AMOUNT_X: i32 = 450;
const RULE_RIGHT: i32 = 520;

/// One block of the appendix, in render order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendixSection<'a> {
    Uncategorized,
    Category(&'a CategorySection),
    Excluded,
}

impl AppendixSection<'_> {
    pub fn title(&self) -> &str {
        match self {
            Self::Uncategorized => UNCATEGORIZED_TITLE,
            Self::Category(section) => &section.name,
            Self::Excluded => EXCLUDED_TITLE,
        }
    }
}

/// Render order of the appendix blocks
pub fn section_order(aggregation: &Aggregation) -> Vec<AppendixSection<'_>> {
    let mut order = Vec::with_capacity(aggregation.tree.sections().len() + 2);
    order.push(AppendixSection::Uncategorized);
    order.extend(
        aggregation
            .tree
            .sections()
            .iter()
            .map(AppendixSection::Category),
    );
    order.push(AppendixSection::Excluded);
    order
}

/// Sums of the line amounts the appendix actually drew
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AppendixTotals {
    pub uncategorized: Money,
    pub categorized: Money,
    /// Duplicates of lines already counted above
    pub excluded: Money,
    pub lines: usize,
}

impl AppendixTotals {
    /// Displayed total with the excluded duplicates removed
    pub fn reconciled_total(&self) -> Money {
        self.uncategorized + self.categorized
    }
}

/// Lay out the whole appendix on `engine`, starting at its current page
pub fn layout_appendix(
    engine: &mut PageLayoutEngine,
    aggregation: &Aggregation,
    symbol: &str,
) -> AppendixTotals {
    let mut totals = AppendixTotals::default();

    for section in section_order(aggregation) {
        match section {
            AppendixSection::Uncategorized => {
                layout_uncategorized(engine, aggregation, symbol, &mut totals)
            }
            AppendixSection::Category(section) => {
                layout_category(engine, section, symbol, &mut totals)
            }
            AppendixSection::Excluded => layout_excluded(engine, aggregation, symbol, &mut totals),
        }
    }

    totals
}

fn header_row(
    engine: &mut PageLayoutEngine,
    kind: RowKind,
    title: &str,
    total: String,
) {
    engine.write_row(kind, |y| {
        vec![
            DrawCommand::band(BAND_LEFT, BAND_RIGHT, y + 7, BAND_WIDTH),
            DrawCommand::inverse_text(60, y, title, Font::bold(22)),
            DrawCommand::inverse_text(TOTAL_X, y, total, Font::bold(22)),
        ]
    });
}

fn line_row(
    engine: &mut PageLayoutEngine,
    kind: RowKind,
    x: i32,
    label: &str,
    amount: String,
) {
    engine.write_row(kind, |y| {
        vec![
            DrawCommand::text(x, y, label, Font::regular(11)),
            DrawCommand::text(AMOUNT_X, y, amount, Font::regular(11)),
            DrawCommand::rule(x + 1, RULE_RIGHT, y - 3),
        ]
    });
}

fn layout_uncategorized(
    engine: &mut PageLayoutEngine,
    aggregation: &Aggregation,
    symbol: &str,
    totals: &mut AppendixTotals,
) {
    // The first block sits at fixed positions above the cursor's top
    engine.draw(DrawCommand::text(60, 740, APPENDIX_TITLE, Font::bold(10)));
    engine.draw(DrawCommand::band(BAND_LEFT, BAND_RIGHT, 720, BAND_WIDTH));
    engine.draw(DrawCommand::inverse_text(
        60,
        713,
        UNCATEGORIZED_TITLE,
        Font::bold(22),
    ));
    engine.draw(DrawCommand::inverse_text(
        TOTAL_X,
        713,
        format_money(symbol, aggregation.uncategorized_total),
        Font::bold(22),
    ));

    for line in &aggregation.uncategorized {
        line_row(
            engine,
            RowKind::UncategorizedLine,
            63,
            &line.label,
            format_money(symbol, line.amount),
        );
        totals.uncategorized += line.amount;
        totals.lines += 1;
    }
}

fn layout_category(
    engine: &mut PageLayoutEngine,
    section: &CategorySection,
    symbol: &str,
    totals: &mut AppendixTotals,
) {
    header_row(
        engine,
        RowKind::SectionHeader,
        &section.name,
        format_money(symbol, section.total()),
    );

    for item in &section.items {
        let item_total = format_money(symbol, item.total());
        engine.write_row(RowKind::ItemHeader, |y| {
            vec![
                DrawCommand::text(65, y, &item.name, Font::bold(20)),
                DrawCommand::text(TOTAL_X, y, item_total, Font::bold(20)),
            ]
        });

        for entry in &item.entries {
            line_row(
                engine,
                RowKind::VendorLine,
                67,
                &entry.vendor,
                format_money(symbol, entry.amount),
            );
            totals.categorized += entry.amount;
            totals.lines += 1;
        }
    }
}

fn layout_excluded(
    engine: &mut PageLayoutEngine,
    aggregation: &Aggregation,
    symbol: &str,
    totals: &mut AppendixTotals,
) {
    header_row(
        engine,
        RowKind::ExcludedHeader,
        EXCLUDED_TITLE,
        format_money(symbol, aggregation.excluded_total),
    );

    for line in &aggregation.excluded {
        line_row(
            engine,
            RowKind::ExcludedLine,
            67,
            &line.label,
            format_money(symbol, line.amount),
        );
        totals.excluded += line.amount;
        totals.lines += 1;
    }
}
