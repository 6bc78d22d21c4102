//! Greedy word-fill slide splitting.

/// Split confession text into slide-sized chunks.
///
/// Words accumulate onto the current slide until adding the next one
/// would push it past `budget` characters, at which point a new slide
/// starts. Words are never split: a single word longer than the budget
/// gets a slide of its own and is the only case allowed to exceed it.
/// Whitespace is normalized to single spaces, so joining the slides with
/// a space reproduces the original word sequence.
///
/// # Examples
///
/// ```
/// use confessio_render::split_text_into_slides;
///
/// let slides = split_text_into_slides("one two three four", 9);
/// assert_eq!(slides, vec!["one two", "three", "four"]);
/// ```
pub fn split_text_into_slides(text: &str, budget: usize) -> Vec<String> {
    let mut slides = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.len() + 1 + word.len() <= budget {
            current.push(' ');
            current.push_str(word);
        } else {
            slides.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }

    if !current.is_empty() {
        slides.push(current);
    }
    slides
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_slide() {
        assert_eq!(split_text_into_slides("hello there", 400), vec!["hello there"]);
    }

    #[test]
    fn no_slide_exceeds_budget() {
        let text = "the quick brown fox jumps over the lazy dog again and again";
        for slide in split_text_into_slides(text, 15) {
            assert!(slide.len() <= 15, "slide too long: {:?}", slide);
        }
    }

    #[test]
    fn words_survive_splitting() {
        let text = "alpha beta gamma delta epsilon zeta eta theta";
        let slides = split_text_into_slides(text, 12);
        let rejoined = slides.join(" ");
        assert_eq!(rejoined, text);
    }

    #[test]
    fn whitespace_is_normalized() {
        let slides = split_text_into_slides("  a \t b\n\nc  ", 400);
        assert_eq!(slides, vec!["a b c"]);
    }

    #[test]
    fn oversized_word_gets_its_own_slide() {
        let slides = split_text_into_slides("a pneumonoultramicroscopic b", 10);
        assert_eq!(
            slides,
            vec!["a", "pneumonoultramicroscopic", "b"]
        );
    }

    #[test]
    fn empty_text_yields_no_slides() {
        assert!(split_text_into_slides("", 400).is_empty());
        assert!(split_text_into_slides("   ", 400).is_empty());
    }

    #[test]
    fn boundary_word_fits_exactly() {
        // "ab cd" is exactly 5 chars, the budget.
        assert_eq!(split_text_into_slides("ab cd", 5), vec!["ab cd"]);
        assert_eq!(split_text_into_slides("ab cde", 5), vec!["ab", "cde"]);
    }
}
