mod auction;
mod bid;
mod error;
mod event;
mod token;

pub use {
    auction::*,
    bid::*,
    error::*,
    event::*,
    token::*,
};
