//! Search criteria and the reducer that updates them.
//!
//! `SearchCriteria` is immutable from the outside: every change goes through
//! [`SearchCriteria::apply`], which returns the next criteria. Query parameters
//! are derived from it by the pure [`SearchCriteria::to_query`].

use std::fmt;
use std::str::FromStr;

use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

use crate::dog::model::Breed;
use crate::error::PawError;

/// Results per page. The service is always asked for exactly this many.
pub const PAGE_SIZE: usize = 10;

/// Largest age offered by the age filters.
pub const MAX_AGE: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortField {
    #[default]
    Breed,
    Name,
    Age,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// `field:direction`, as the service expects in the `sort` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SortOrder {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Every supported ordering, in menu order.
    pub fn all() -> Vec<SortOrder> {
        SortField::iter()
            .flat_map(|field| SortDirection::iter().map(move |direction| Self::new(field, direction)))
            .collect()
    }

    /// Human label shown in the sort menu.
    pub fn label(&self) -> &'static str {
        match (self.field, self.direction) {
            (SortField::Breed, SortDirection::Asc) => "Breed (A-Z)",
            (SortField::Breed, SortDirection::Desc) => "Breed (Z-A)",
            (SortField::Name, SortDirection::Asc) => "Name (A-Z)",
            (SortField::Name, SortDirection::Desc) => "Name (Z-A)",
            (SortField::Age, SortDirection::Asc) => "Age (Young to Old)",
            (SortField::Age, SortDirection::Desc) => "Age (Old to Young)",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field, self.direction)
    }
}

impl FromStr for SortOrder {
    type Err = PawError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = s.trim().split_once(':').unwrap_or((s.trim(), "asc"));
        let field = SortField::from_str(field)
            .map_err(|_| PawError::validation(format!("Unknown sort field '{}'", field)))?;
        let direction = SortDirection::from_str(direction)
            .map_err(|_| PawError::validation(format!("Unknown sort direction '{}'", direction)))?;
        Ok(Self::new(field, direction))
    }
}

/// Breed filter. Selecting a breed and typing free text are mutually
/// exclusive, so they share one slot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BreedQuery {
    #[default]
    Any,
    /// A breed picked from the breed list.
    Selected(Breed),
    /// Free text typed into the search box.
    Text(String),
}

impl BreedQuery {
    /// The value sent as `breeds[]`, if any.
    pub fn as_param(&self) -> Option<&str> {
        match self {
            Self::Any => None,
            Self::Selected(breed) => Some(breed),
            Self::Text(text) => Some(text),
        }
    }
}

/// One user edit to the criteria.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CriteriaAction {
    /// Free-text search. Empty text clears the breed filter.
    SearchText(String),
    /// Pick a breed from the list, or `None` for all breeds.
    SelectBreed(Option<Breed>),
    ZipCode(Option<String>),
    AgeMin(Option<u32>),
    AgeMax(Option<u32>),
    Sort(SortOrder),
    /// Absolute, zero-based page index.
    GoToPage(usize),
    NextPage,
    PrevPage,
}

impl CriteriaAction {
    /// Page navigation keeps the filters; everything else starts over at page 0.
    pub fn is_navigation(&self) -> bool {
        matches!(self, Self::GoToPage(_) | Self::NextPage | Self::PrevPage)
    }
}

/// The combined filter, sort and page selection driving a catalog fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchCriteria {
    pub breed: BreedQuery,
    pub zip_code: Option<String>,
    pub age_min: Option<u32>,
    pub age_max: Option<u32>,
    pub sort: SortOrder,
    pub page: usize,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected breed, if the filter came from the breed list.
    pub fn selected_breed(&self) -> Option<&str> {
        match &self.breed {
            BreedQuery::Selected(breed) => Some(breed),
            _ => None,
        }
    }

    /// Current free-text search, if any.
    pub fn search_text(&self) -> Option<&str> {
        match &self.breed {
            BreedQuery::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the criteria after `action`.
    pub fn apply(&self, action: CriteriaAction) -> SearchCriteria {
        let mut next = self.clone();
        if !action.is_navigation() {
            next.page = 0;
        }

        match action {
            CriteriaAction::SearchText(text) => {
                next.breed = match non_blank(Some(text)) {
                    Some(text) => BreedQuery::Text(text),
                    None => BreedQuery::Any,
                };
            }
            CriteriaAction::SelectBreed(breed) => {
                next.breed = match non_blank(breed) {
                    Some(breed) => BreedQuery::Selected(breed),
                    None => BreedQuery::Any,
                };
            }
            CriteriaAction::ZipCode(zip) => next.zip_code = non_blank(zip),
            CriteriaAction::AgeMin(age) => next.age_min = age,
            CriteriaAction::AgeMax(age) => next.age_max = age,
            CriteriaAction::Sort(sort) => next.sort = sort,
            CriteriaAction::GoToPage(page) => next.page = page,
            CriteriaAction::NextPage => next.page = self.page.saturating_add(1),
            CriteriaAction::PrevPage => next.page = self.page.saturating_sub(1),
        }

        next
    }

    /// Offset of the first result on the current page. Saturates instead of
    /// wrapping for absurd page numbers.
    pub fn from(&self) -> usize {
        self.page.saturating_mul(PAGE_SIZE)
    }

    /// Query parameters for `GET /dogs/search`, in a stable order.
    ///
    /// Unset filters are omitted entirely rather than sent empty.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(7);
        if let Some(breed) = self.breed.as_param() {
            params.push(("breeds[]", breed.to_string()));
        }
        if let Some(zip) = &self.zip_code {
            params.push(("zipCodes[]", zip.clone()));
        }
        if let Some(age) = self.age_min {
            params.push(("ageMin", age.to_string()));
        }
        if let Some(age) = self.age_max {
            params.push(("ageMax", age.to_string()));
        }
        params.push(("size", PAGE_SIZE.to_string()));
        params.push(("from", self.from().to_string()));
        params.push(("sort", self.sort.to_string()));
        params
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_page(page: usize) -> SearchCriteria {
        SearchCriteria {
            page,
            ..Default::default()
        }
    }

    #[test]
    fn test_huge_page_offset_saturates() {
        let criteria = on_page(usize::MAX - 1);
        assert_eq!(criteria.from(), usize::MAX);

        let query = criteria.to_query();
        assert!(query.contains(&("from", usize::MAX.to_string())));
    }

    #[test]
    fn test_default_sort_is_breed_asc() {
        let criteria = SearchCriteria::new();
        assert_eq!(criteria.sort.to_string(), "breed:asc");
        assert_eq!(criteria.page, 0);
        assert_eq!(criteria.breed, BreedQuery::Any);
    }

    #[test]
    fn test_selecting_breed_clears_search_text() {
        let criteria = SearchCriteria::new()
            .apply(CriteriaAction::SearchText("lab".into()))
            .apply(CriteriaAction::SelectBreed(Some("Beagle".into())));

        assert_eq!(criteria.selected_breed(), Some("Beagle"));
        assert_eq!(criteria.search_text(), None);
    }

    #[test]
    fn test_search_text_clears_selected_breed() {
        let criteria = SearchCriteria::new()
            .apply(CriteriaAction::SelectBreed(Some("Beagle".into())))
            .apply(CriteriaAction::SearchText("poodle".into()));

        assert_eq!(criteria.search_text(), Some("poodle"));
        assert_eq!(criteria.selected_breed(), None);
    }

    #[test]
    fn test_blank_values_clear_filters() {
        let criteria = SearchCriteria::new()
            .apply(CriteriaAction::SelectBreed(Some("Beagle".into())))
            .apply(CriteriaAction::ZipCode(Some("10001".into())))
            .apply(CriteriaAction::SearchText("   ".into()))
            .apply(CriteriaAction::ZipCode(Some("".into())));

        assert_eq!(criteria.breed, BreedQuery::Any);
        assert_eq!(criteria.zip_code, None);
    }

    #[test]
    fn test_every_filter_change_resets_page() {
        let actions = vec![
            CriteriaAction::SearchText("lab".into()),
            CriteriaAction::SelectBreed(Some("Pug".into())),
            CriteriaAction::SelectBreed(None),
            CriteriaAction::ZipCode(Some("94110".into())),
            CriteriaAction::AgeMin(Some(2)),
            CriteriaAction::AgeMax(None),
            CriteriaAction::Sort("age:desc".parse().unwrap()),
        ];

        for action in actions {
            let next = on_page(4).apply(action.clone());
            assert_eq!(next.page, 0, "{:?} should reset the page", action);
        }
    }

    #[test]
    fn test_navigation_keeps_filters() {
        let base = SearchCriteria::new()
            .apply(CriteriaAction::ZipCode(Some("10001".into())))
            .apply(CriteriaAction::GoToPage(3));
        assert_eq!(base.page, 3);
        assert_eq!(base.zip_code.as_deref(), Some("10001"));

        assert_eq!(base.apply(CriteriaAction::NextPage).page, 4);
        assert_eq!(base.apply(CriteriaAction::PrevPage).page, 2);
        assert_eq!(on_page(0).apply(CriteriaAction::PrevPage).page, 0);
    }

    #[test]
    fn test_query_minimal() {
        let query = SearchCriteria::new().to_query();
        assert_eq!(
            query,
            vec![
                ("size", "10".to_string()),
                ("from", "0".to_string()),
                ("sort", "breed:asc".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_full() {
        let criteria = SearchCriteria::new()
            .apply(CriteriaAction::SelectBreed(Some("Beagle".into())))
            .apply(CriteriaAction::ZipCode(Some("10001".into())))
            .apply(CriteriaAction::AgeMin(Some(1)))
            .apply(CriteriaAction::AgeMax(Some(8)))
            .apply(CriteriaAction::Sort("name:desc".parse().unwrap()))
            .apply(CriteriaAction::GoToPage(2));

        assert_eq!(
            criteria.to_query(),
            vec![
                ("breeds[]", "Beagle".to_string()),
                ("zipCodes[]", "10001".to_string()),
                ("ageMin", "1".to_string()),
                ("ageMax", "8".to_string()),
                ("size", "10".to_string()),
                ("from", "20".to_string()),
                ("sort", "name:desc".to_string()),
            ]
        );
    }

    #[test]
    fn test_free_text_goes_into_breeds_param() {
        let criteria = SearchCriteria::new().apply(CriteriaAction::SearchText("Lab".into()));
        assert!(criteria.to_query().contains(&("breeds[]", "Lab".to_string())));
    }

    #[test]
    fn test_sort_order_parse() {
        let sort: SortOrder = "AGE:Desc".parse().unwrap();
        assert_eq!(sort, SortOrder::new(SortField::Age, SortDirection::Desc));

        let bare: SortOrder = "name".parse().unwrap();
        assert_eq!(bare.to_string(), "name:asc");

        assert!("height:asc".parse::<SortOrder>().is_err());
        assert!("breed:up".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_sort_menu_order_and_labels() {
        let all = SortOrder::all();
        let keys: Vec<String> = all.iter().map(|s| s.to_string()).collect();
        assert_eq!(
            keys,
            vec!["breed:asc", "breed:desc", "name:asc", "name:desc", "age:asc", "age:desc"]
        );
        assert_eq!(all[4].label(), "Age (Young to Old)");
    }
}
