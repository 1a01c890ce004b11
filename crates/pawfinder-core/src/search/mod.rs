//! Catalog search criteria.

pub mod criteria;

pub use criteria::{
    BreedQuery, CriteriaAction, MAX_AGE, PAGE_SIZE, SearchCriteria, SortDirection, SortField,
    SortOrder,
};
