//! Output formatting for CLI

use crate::{
    Result,
    gridworld::{Action, GridWorld, Position},
    q_learning::ActionValueTable,
};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Render the greedy action of every cell as an arrow.
///
/// The goal shows `G` and hazards `~`, as in the grid display.
pub fn render_policy(world: &GridWorld, table: &ActionValueTable) -> Result<String> {
    let mut out = String::new();
    for row in 0..world.size() {
        for column in 0..world.size() {
            let cell = Position::new(column, row);
            let glyph = if cell == world.goal() {
                'G'
            } else if world.is_hazard(cell) {
                '~'
            } else {
                table
                    .best_action(cell, &world.legal_actions(cell))?
                    .arrow()
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    Ok(out)
}

/// One line with the value of every action from `cell`.
pub fn format_values(table: &ActionValueTable, cell: Position) -> Result<String> {
    let values = table.row(cell)?;
    Ok(Action::ALL
        .iter()
        .map(|action| format!("{}={:+.4}", action, values[action.index()]))
        .collect::<Vec<_>>()
        .join("  "))
}
