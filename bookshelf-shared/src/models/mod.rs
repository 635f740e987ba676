/// Plain data records for Bookshelf
///
/// These types carry no database behavior of their own; reads and writes go
/// through the traits in [`crate::repository`].
///
/// - `book`: catalog entries and the wildcard search input
/// - `review`: user reviews and their validation rules
/// - `user`: registered accounts

pub mod book;
pub mod review;
pub mod user;
