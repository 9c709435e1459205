pub mod admin;
pub mod content;
pub mod league;
pub mod notification;
pub mod player;
pub mod reel;
pub mod role;
pub mod subscriber;
pub mod team;
pub mod user;

pub use admin::{AdminAccount, AdminView};
pub use content::{ContentPage, Faq};
pub use league::League;
pub use notification::Notification;
pub use player::Player;
pub use reel::Reel;
pub use role::Role;
pub use subscriber::Subscriber;
pub use team::Team;
pub use user::User;
