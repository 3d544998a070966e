use common::models::Category;

use crate::normalizer::NormalizeError;

/// What a raw record cannot tell about itself.
#[derive(Debug, Clone, Copy)]
pub struct RecordContext<'a> {
    pub index: usize,
    pub symbol: &'a str,
    pub exchange: Option<&'a str>,
    pub category: Category,
}

pub trait RemoteResponse<T> {
    fn to_insertable(self, ctx: &RecordContext<'_>) -> Result<T, NormalizeError>;
}
