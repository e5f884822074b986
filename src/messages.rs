/// Every piece of text shown to the user.
pub struct Messages {
    pub welcome: &'static str,
    pub question_website_name: &'static str,
    pub question_security_questions: &'static str,
    pub question_password_length: &'static str,
    pub error_required_answer: &'static str,
    pub error_invalid_integer: &'static str,
    pub result: &'static str,
    pub clipboard: &'static str,
    pub clipboard_copied: &'static str,
    pub clipboard_unavailable: &'static str,
    pub warning_not_nfc: &'static str,
    pub aborted: &'static str,
    pub example: &'static [&'static str],
}

/// Separator between answers typed on one line.
pub const ANSWER_DELIMITER: char = '&';

impl Messages {
    pub const ENGLISH: Self = Self {
        welcome: "Welcome to passgen. Your password is derived from the answers you give, \
                  so the same answers always produce the same password.\n\
                  Press Enter to begin.",
        question_website_name: "Website name: ",
        question_security_questions: "Answers to your security questions, separated by '&' \
                                      (input hidden, leave empty to skip): ",
        question_password_length: "Maximum password length (Enter for default): ",
        error_required_answer: "An answer is required.",
        error_invalid_integer: "Please enter a whole number of at least 4.",
        result: "Your password is:",
        clipboard: "Copy to clipboard? [y/N]: ",
        clipboard_copied: "Copied to clipboard.",
        clipboard_unavailable: "No clipboard available; nothing was copied.",
        warning_not_nfc: "is not in Unicode NFC form; typing it on another system may give a different password",
        aborted: "Aborted.",
        example: &[
            "Examples:",
            "",
            "  passgen",
            "      Ask for the website name, security answers and length interactively.",
            "",
            "  passgen example.com",
            "      Password for example.com with no security answers.",
            "",
            "  passgen example.com \"Fluffy\" \"Springfield\"",
            "      Password for example.com using two security answers, in that order.",
            "",
            "  passgen --max-length 20 example.com",
            "      As above, limited to 20 characters.",
            "",
            "  passgen --algorithm v2 example.com",
            "      Use the v2 derivation algorithm. Passwords differ between versions.",
        ],
    };
}
