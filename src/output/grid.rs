// Shaded topic grid for the terminal.
//
// Rows are topics and columns are sampled documents; each cell's shade is
// the topic's probability in that document. Topic 0 is the top row, the way
// an inverted-y plot of the matrix reads. Document ids run vertically under
// their columns.

use colored::Colorize;

use crate::bucket::SampleMatrix;

const SHADES: [char; 5] = [' ', '░', '▒', '▓', '█'];

/// Characters per document column.
const CELL_WIDTH: usize = 2;

/// Shade for a probability: blank for zero, then one step per quarter.
pub fn shade(probability: f64) -> char {
    if probability <= 0.0 || probability.is_nan() {
        return SHADES[0];
    }
    let step = ((probability * 4.0) as usize).min(3);
    SHADES[1 + step]
}

/// Build the grid as plain text lines (no color).
pub fn render_lines(matrix: &SampleMatrix) -> Vec<String> {
    let mut lines = Vec::with_capacity(matrix.num_topics + 4);

    for topic in 0..matrix.num_topics {
        let cells: String = matrix
            .topic_row(topic)
            .into_iter()
            .map(|p| shade(p).to_string().repeat(CELL_WIDTH))
            .collect();
        lines.push(format!("  T{topic:>3} │{cells}│"));
    }

    lines.push(format!("       └{}┘", "─".repeat(matrix.len() * CELL_WIDTH)));

    // Vertical id labels, one digit per line, right-aligned
    let labels: Vec<String> = matrix.ids.iter().map(|id| id.to_string()).collect();
    let height = labels.iter().map(String::len).max().unwrap_or(0);
    for row in 0..height {
        let line: String = labels
            .iter()
            .map(|label| {
                let pad = height - label.len();
                let digit = if row >= pad {
                    label.as_bytes()[row - pad] as char
                } else {
                    ' '
                };
                format!("{digit:<width$}", width = CELL_WIDTH)
            })
            .collect();
        lines.push(format!("        {}", line.trim_end()));
    }

    lines
}

/// Print the grid with a header and legend.
pub fn display(matrix: &SampleMatrix, grouped: bool) {
    let order = if grouped {
        "grouped by dominant topic"
    } else {
        "in arrival order"
    };
    println!(
        "\n{}",
        format!(
            "=== Topic Grid ({} documents x {} topics, {}) ===",
            matrix.len(),
            matrix.num_topics,
            order
        )
        .bold()
    );
    println!();

    if matrix.is_empty() {
        println!("  No documents sampled.");
        return;
    }

    let line_count = matrix.num_topics + 1;
    for (i, line) in render_lines(matrix).into_iter().enumerate() {
        if i < line_count {
            println!("{line}");
        } else {
            println!("{}", line.dimmed());
        }
    }

    println!();
    println!(
        "  Legend: {} 0  {} <25%  {} <50%  {} <75%  {} ≥75%",
        format!("[{}]", SHADES[0]).dimmed(),
        SHADES[1],
        SHADES[2],
        SHADES[3],
        SHADES[4]
    );
}
