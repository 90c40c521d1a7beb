use shelfcore_filter::{FilterSignature, FilterState};
use shelfcore_model::{PageRequest, PageResponse};

pub const PAGE_LIMIT: u32 = 30;

/// Cache/dedupe identity of one page fetch. Two keys are the same request
/// only when both the index and the filter signature match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageKey {
    pub index: u32,
    pub signature: FilterSignature,
}

impl PageKey {
    pub fn new(index: u32, signature: FilterSignature) -> Self {
        Self { index, signature }
    }
}

/// Pure derivation of the next request descriptor. Page 0 is always
/// requestable (the first page gets revalidated after every signature
/// change); page n > 0 only follows a preceding page that reported more
/// data. `None` halts pagination for this signature.
pub fn derive_request(
    index: u32,
    previous: Option<&PageResponse>,
    filter: &FilterState,
) -> Option<PageRequest> {
    if index > 0 {
        match previous {
            Some(page) if page.has_more => {}
            _ => return None,
        }
    }

    let tag_ids = if filter.tag_ids.is_empty() {
        None
    } else {
        Some(filter.tag_ids.iter().cloned().collect())
    };

    Some(PageRequest {
        page: index + 1,
        limit: PAGE_LIMIT,
        name: filter.keywords.clone(),
        is_created_by_me: filter.created_by_me,
        mode: filter.tab.mode(),
        tag_ids,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelfcore_filter::ShelfTab;

    fn page(has_more: bool) -> PageResponse {
        PageResponse {
            data: Vec::new(),
            total: 45,
            has_more,
        }
    }

    #[test]
    fn page_zero_is_always_requestable() {
        let request = derive_request(0, None, &FilterState::default()).unwrap();
        assert_eq!(request.page, 1);
        assert_eq!(request.limit, PAGE_LIMIT);
    }

    #[test]
    fn later_pages_need_a_preceding_page_with_more() {
        let filter = FilterState::default();
        assert!(derive_request(1, None, &filter).is_none());
        assert!(derive_request(1, Some(&page(false)), &filter).is_none());

        let request = derive_request(1, Some(&page(true)), &filter).unwrap();
        assert_eq!(request.page, 2);
    }

    #[test]
    fn descriptor_omits_what_the_filters_leave_empty() {
        let request = derive_request(0, None, &FilterState::default()).unwrap();
        assert_eq!(request.name, "");
        assert!(!request.is_created_by_me);
        assert!(request.mode.is_none());
        assert!(request.tag_ids.is_none());
    }

    #[test]
    fn descriptor_carries_active_filters() {
        let mut filter = FilterState::default().with_tab(ShelfTab::Workflow);
        filter.created_by_me = true;
        filter.keywords = "invoice".to_string();
        filter.toggle_tag("ops");
        filter.toggle_tag("billing");

        let request = derive_request(0, None, &filter).unwrap();
        assert_eq!(request.mode, filter.tab.mode());
        assert!(request.is_created_by_me);
        assert_eq!(request.name, "invoice");
        assert_eq!(
            request.tag_ids,
            Some(vec!["billing".to_string(), "ops".to_string()])
        );
    }

    #[test]
    fn keys_differ_when_either_field_differs() {
        let base = FilterState::default();
        let other = base.clone().with_tab(ShelfTab::Chat);

        let a = PageKey::new(0, base.signature());
        let b = PageKey::new(1, base.signature());
        let c = PageKey::new(0, other.signature());

        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, PageKey::new(0, base.signature()));
    }
}
