use rand::seq::SliceRandom;
use rand::Rng;

/// Image identifiers shipped with the demo protocol.
pub const DEFAULT_IMAGES: [&str; 4] = ["pt1.jpg", "pt2.jpg", "nt1.jpg", "nt2.jpg"];

/// Hands out a fresh random ordering of a fixed set of image identifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct DeckProvider {
    images: Vec<String>,
}

impl DeckProvider {
    pub fn new<I, S>(images: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            images: images.into_iter().map(Into::into).collect(),
        }
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Uniform permutation using the thread-local rng.
    pub fn deal(&self) -> Vec<String> {
        self.deal_with(&mut rand::thread_rng())
    }

    pub fn deal_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<String> {
        let mut deck = self.images.clone();
        deck.shuffle(rng);
        deck
    }
}

impl Default for DeckProvider {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sorted(mut v: Vec<String>) -> Vec<String> {
        v.sort();
        v
    }

    #[test]
    fn deal_is_a_permutation_of_the_image_set() {
        let provider = DeckProvider::default();
        for _ in 0..20 {
            let deck = provider.deal();
            assert_eq!(deck.len(), provider.len());
            assert_eq!(sorted(deck), sorted(provider.images().to_vec()));
        }
    }

    #[test]
    fn repeated_deals_vary_order() {
        let provider = DeckProvider::new((0..10).map(|i| format!("img{i}.png")));
        let first = provider.deal();
        // 10! orderings; 50 identical draws in a row would mean the shuffle is broken
        let varied = (0..50).any(|_| provider.deal() != first);
        assert!(varied);
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let provider = DeckProvider::default();
        let a = provider.deal_with(&mut StdRng::seed_from_u64(7));
        let b = provider.deal_with(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn empty_set_yields_empty_deck() {
        let provider = DeckProvider::new(Vec::<String>::new());
        assert!(provider.is_empty());
        assert!(provider.deal().is_empty());
    }

    #[test]
    fn duplicates_are_preserved() {
        let provider = DeckProvider::new(["a.jpg", "a.jpg", "b.jpg"]);
        let deck = sorted(provider.deal());
        assert_eq!(deck, vec!["a.jpg", "a.jpg", "b.jpg"]);
    }
}
