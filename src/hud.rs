//! Heads-up display text

/// Spelled-out lives count: "One Life", "Seven Lives".
/// Values outside 0..=10 render as the bare number.
///
/// The count is always spelled out; the digit form ("10 Lives", "1 Life")
/// is never produced for values inside the table.
pub fn lives_to_words(lives: i32) -> String {
    let word = match lives {
        0 => "Zero",
        1 => return "One Life".to_string(),
        2 => "Two",
        3 => "Three",
        4 => "Four",
        5 => "Five",
        6 => "Six",
        7 => "Seven",
        8 => "Eight",
        9 => "Nine",
        10 => "Ten",
        _ => return lives.to_string(),
    };
    format!("{word} Lives")
}

/// The live readout drawn in the top-left corner
pub fn lives_label(lives: i32) -> String {
    format!("Lives: {}", lives_to_words(lives))
}
