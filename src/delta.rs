use crate::types::Article;

/// Computes the subset of `current` that has not been seen before.
///
/// An article is new iff no article in `previous` carries an equal `title`.
/// The result preserves the order of `current`. The linear scan over
/// `previous` per item is O(n*m), which is fine at feed-sized batches of a
/// few dozen items.
///
/// An empty `previous` (first run ever, or an earlier store failure) makes
/// every current article new, so the first cycle delivers the full backlog.
pub fn delta(current: &[Article], previous: &[Article]) -> Vec<Article> {
    current
        .iter()
        .filter(|article| !previous.iter().any(|prev| prev.title == article.title))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str) -> Article {
        Article {
            title: title.to_string(),
            description: format!("{} description", title),
            url: format!("https://example.com/{}", title),
            image: format!("https://example.com/{}.jpg", title),
        }
    }

    #[test]
    fn empty_previous_yields_full_batch() {
        let current = vec![article("A"), article("B")];
        assert_eq!(delta(&current, &[]), current);
    }

    #[test]
    fn identical_batches_yield_nothing() {
        let batch = vec![article("A"), article("B"), article("C")];
        assert!(delta(&batch, &batch).is_empty());
    }

    #[test]
    fn empty_current_yields_nothing() {
        let previous = vec![article("A")];
        assert!(delta(&[], &previous).is_empty());
    }

    #[test]
    fn only_unseen_titles_survive() {
        let previous = vec![article("A")];
        let current = vec![article("A"), article("B")];
        assert_eq!(delta(&current, &previous), vec![article("B")]);
    }

    #[test]
    fn result_preserves_current_order() {
        let previous = vec![article("C")];
        let current = vec![article("D"), article("C"), article("B"), article("A")];
        let fresh = delta(&current, &previous);
        let titles: Vec<&str> = fresh.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["D", "B", "A"]);
    }

    #[test]
    fn title_alone_decides_identity() {
        // Same title with a different body still counts as already seen.
        let mut reworded = article("A");
        reworded.description = "updated description".to_string();
        let previous = vec![article("A")];
        assert!(delta(&[reworded], &previous).is_empty());
    }
}
