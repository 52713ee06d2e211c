//! Number formatting for Spanish answers.

/// Colombian peso amount rounded to whole pesos: `$1.234.567`.
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}${}", sign, group_thousands(rounded.abs() as u64))
}

/// Integer with `.` as thousands separator: `12.345`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    grouped
}
