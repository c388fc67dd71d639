/// Feedback page the hotel code is appended to.
pub const FEEDBACK_BASE_URL: &str = "https://roommitra.com/feedback?h=";

/// Returns the feedback URL for a hotel.
///
/// The code is appended as is; callers supply a URL-safe identifier.
///
/// # Example
///
/// ```
/// use feedback_qr::url::feedback_url;
///
/// assert_eq!(feedback_url("Woodrose"), "https://roommitra.com/feedback?h=Woodrose");
/// ```
pub fn feedback_url(hotel_code: &str) -> String {
    format!("{FEEDBACK_BASE_URL}{hotel_code}")
}

/// File name of the generated image for a hotel, `qr_<code>.png`.
pub fn output_file_name(hotel_code: &str) -> String {
    format!("qr_{hotel_code}.png")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_not_escaped() {
        assert_eq!(
            feedback_url("a b&c"),
            "https://roommitra.com/feedback?h=a b&c"
        );
        assert_eq!(feedback_url(""), FEEDBACK_BASE_URL);
    }

    #[test]
    fn file_name_embeds_code() {
        assert_eq!(output_file_name("Woodrose"), "qr_Woodrose.png");
    }
}
