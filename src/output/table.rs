use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ContentArrangement, Table, TableComponent,
    modifiers::UTF8_SOLID_INNER_BORDERS,
    presets::{NOTHING, UTF8_FULL},
};

use crate::menu::MenuRecord;

fn header_cell(text: &str, use_color: bool) -> Cell {
    let mut cell = Cell::new(text).add_attribute(Attribute::Bold);
    if use_color {
        cell = cell.fg(Color::Cyan);
    }
    cell
}

fn right_cell(text: &str, color: Option<Color>) -> Cell {
    let mut cell = Cell::new(text).set_alignment(CellAlignment::Right);
    if let Some(c) = color {
        cell = cell.fg(c);
    }
    cell
}

/// Standard preset with inner borders and a single-line header separator (├─┼─┤)
fn create_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_style(TableComponent::HeaderLines, '─');
    table.set_style(TableComponent::LeftHeaderIntersection, '├');
    table.set_style(TableComponent::MiddleHeaderIntersections, '┼');
    table.set_style(TableComponent::RightHeaderIntersection, '┤');
    table
}

pub(super) fn render_records_table(records: &[MenuRecord], use_color: bool) -> Table {
    let mut table = create_styled_table();
    table.set_header(
        ["ID", "Name", "Price", "Category", "Description", "Start", "End"]
            .map(|h| header_cell(h, use_color)),
    );

    let price_color = if use_color { Some(Color::Green) } else { None };
    for record in records {
        table.add_row(vec![
            Cell::new(&record.id),
            Cell::new(&record.name),
            right_cell(&record.price, price_color),
            Cell::new(&record.category),
            Cell::new(&record.description),
            Cell::new(&record.day_start),
            Cell::new(&record.day_end),
        ]);
    }
    table
}

/// Borderless bold title line shown above a table
fn render_title(title: &str, use_color: bool) -> Table {
    let mut table = Table::new();
    table.load_preset(NOTHING);
    if use_color {
        table.enforce_styling();
    } else {
        table.force_no_tty();
    }
    table.add_row(vec![Cell::new(title).add_attribute(Attribute::Bold)]);
    table
}

pub(crate) fn print_records_table(title: &str, records: &[MenuRecord], use_color: bool) {
    println!("\n{}\n", render_title(title, use_color));
    println!("{}", render_records_table(records, use_color));
    println!("\n  {} rows\n", records.len());
}
