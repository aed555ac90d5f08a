/// Paragraph every session is measured against.
pub const REFERENCE_TEXT: &str = "Typing is a fundamental skill in the digital age. \
Being able to type quickly and accurately saves time and improves productivity. \
Practice every day to build muscle memory and enhance your focus. \
Remember, consistency is the key to becoming a fast and confident typist.";
