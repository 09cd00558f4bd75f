pub mod clock;
pub mod commitment;
pub mod entities;
pub mod ledger;

#[cfg(test)]
pub mod test_utils {
    use time::OffsetDateTime;

    pub const SELLER: &str = "seller";
    pub const ADMIN: &str = "admin";

    // 2024-01-01T00:00:00Z
    pub fn genesis_time() -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(1_704_067_200).unwrap()
    }
}
