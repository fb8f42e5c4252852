// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tessera-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessera and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Cell arithmetic for preview rows. Widths count chars, not bytes.

const ELLIPSIS: char = '…';

/// One preview row: indentation followed by a node label, clipped to the configured width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FittedRow {
    pub line: String,
    /// Inclusive cell range covered by the (possibly clipped) label; `None` when clipping left
    /// nothing but indentation.
    pub label_cells: Option<(usize, usize)>,
}

pub(crate) fn fit_row(indent: usize, label: &str, max_width: Option<usize>) -> FittedRow {
    let mut line = " ".repeat(indent);
    line.push_str(label);
    let mut cells = indent + label.chars().count();

    if let Some(width) = max_width.filter(|width| cells > *width) {
        line = clip(&line, width);
        cells = width;
    }

    FittedRow {
        line,
        label_cells: (cells > indent).then(|| (indent, cells - 1)),
    }
}

fn clip(line: &str, width: usize) -> String {
    match width {
        0 => String::new(),
        1 => ELLIPSIS.to_string(),
        _ => {
            let mut out: String = line.chars().take(width - 1).collect();
            out.push(ELLIPSIS);
            out
        }
    }
}

/// Collapses line breaks so one preview row never spans several terminal lines.
pub(crate) fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
