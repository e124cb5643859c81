// Entity Models
//
// Typed records at the service boundary: raw JSON is validated into these
// before storage, and stored documents are converted back before they leave
// the API.

pub mod player;

pub use player::{Debt, Holding, Player, PlayerRecord};
