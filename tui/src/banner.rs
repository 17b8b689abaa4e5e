//! Block-letter banner drawn above the exception frame.

/// Rows per glyph.
pub const BANNER_HEIGHT: u16 = 5;

const GLYPH_WIDTH: usize = 5;

fn glyph(letter: char) -> Option<[&'static str; 5]> {
    let rows = match letter {
        'C' => [" ####", "#    ", "#    ", "#    ", " ####"],
        'E' => ["#####", "#    ", "#### ", "#    ", "#####"],
        'I' => ["#####", "  #  ", "  #  ", "  #  ", "#####"],
        'N' => ["#   #", "##  #", "# # #", "#  ##", "#   #"],
        'O' => [" ### ", "#   #", "#   #", "#   #", " ### "],
        'P' => ["#### ", "#   #", "#### ", "#    ", "#    "],
        'T' => ["#####", "  #  ", "  #  ", "  #  ", "  #  "],
        'X' => ["#   #", " # # ", "  #  ", " # # ", "#   #"],
        ' ' => ["     "; 5],
        _ => return None,
    };
    Some(rows)
}

/// Columns needed to render `text`.
#[must_use]
pub fn banner_width(text: &str) -> usize {
    let letters = text.chars().count();
    letters * GLYPH_WIDTH + letters.saturating_sub(1)
}

/// Render `text` in block letters using `fill` for ink.
///
/// `None` when `text` contains a letter the font does not cover.
#[must_use]
pub fn banner_lines(text: &str, fill: char) -> Option<Vec<String>> {
    let glyphs = text.chars().map(glyph).collect::<Option<Vec<_>>>()?;
    let lines = (0..BANNER_HEIGHT as usize)
        .map(|row| {
            glyphs
                .iter()
                .map(|glyph| glyph[row].replace('#', &fill.to_string()))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();
    Some(lines)
}

#[cfg(test)]
mod tests {
    use super::{BANNER_HEIGHT, banner_lines, banner_width};

    #[test]
    fn renders_exception_banner() {
        let lines = banner_lines("EXCEPTION", '#').unwrap();
        assert_eq!(lines.len(), BANNER_HEIGHT as usize);
        assert!(lines.iter().all(|line| line.chars().count() == banner_width("EXCEPTION")));
        assert!(lines[0].starts_with("##### #   #  ####"));
    }

    #[test]
    fn fill_character_is_substituted() {
        let lines = banner_lines("I", '█').unwrap();
        assert_eq!(lines[0], "█████");
        assert_eq!(lines[1], "  █  ");
    }

    #[test]
    fn unknown_letters_are_rejected() {
        assert!(banner_lines("OOPS!", '#').is_none());
    }
}
