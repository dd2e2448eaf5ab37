use crate::models::dump_target::DumpTarget;
use crate::models::error::Result;
use crate::models::extracted_message::FieldMap;
use crate::models::page::PageRequest;
use log::debug;
use std::sync::Arc;

/// Storage that can return one keyset page of a table
pub trait LogStore: Send + Sync {
    /// Rows of `target`, newest first by its paging field, restricted to
    /// paging values strictly below `page.offset` when both are present.
    fn dump_table(&self, target: &DumpTarget, page: &PageRequest) -> Result<Vec<FieldMap>>;
}

#[derive(Clone)]
pub struct PagedReader {
    store: Arc<dyn LogStore>,
}

impl PagedReader {
    pub fn new(store: Arc<dyn LogStore>) -> Self {
        Self { store }
    }

    /// Dump one page of `table`.
    ///
    /// Table and paging field must be on the allow-list. Offset and page size
    /// are raw caller input and fall back to defaults when they do not parse.
    pub fn dump(
        &self,
        table: &str,
        paging_field: Option<&str>,
        offset: Option<&str>,
        page_size: Option<&str>,
    ) -> Result<Vec<FieldMap>> {
        let target = DumpTarget::new(table, paging_field)?;
        let page = PageRequest::parse(offset, page_size);
        self.dump_page(&target, &page)
    }

    pub fn dump_page(&self, target: &DumpTarget, page: &PageRequest) -> Result<Vec<FieldMap>> {
        debug!(
            "Dumping {} by {:?} below {:?} (page size {})",
            target.table().name(),
            target.paging_field(),
            page.offset,
            page.page_size
        );
        self.store.dump_table(target, page)
    }
}
