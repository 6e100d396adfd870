//! Random nickname suggestions for accounts registered without one.

use rand::Rng;
use rand::seq::SliceRandom;

use super::user::Nickname;

const ADJECTIVES: &[&str] = &[
    "clever", "jolly", "brave", "sly", "gentle", "swift", "quiet", "bold", "lucky", "merry",
];
const ANIMALS: &[&str] = &[
    "panda", "fox", "raccoon", "koala", "lion", "otter", "heron", "badger", "lynx", "wombat",
];

/// Produce a nickname of the form `<adjective>_<animal>_<0..=999>`.
///
/// # Examples
/// ```
/// use event_manager::domain::generate_nickname;
///
/// let nickname = generate_nickname(&mut rand::thread_rng());
/// assert_eq!(nickname.as_ref().split('_').count(), 3);
/// ```
pub fn generate_nickname<R: Rng + ?Sized>(rng: &mut R) -> Nickname {
    let adjective = ADJECTIVES.choose(rng).copied().unwrap_or("quick");
    let animal = ANIMALS.choose(rng).copied().unwrap_or("fox");
    let number: u16 = rng.gen_range(0..=999);
    // Word lists hold lower-case ASCII words of at least three letters.
    Nickname::from_trusted(format!("{adjective}_{animal}_{number}"))
}
