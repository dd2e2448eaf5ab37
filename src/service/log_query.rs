use crate::models::api::{QueryMode, QueryParams, QueryResponse};
use crate::models::error::Result;
use crate::models::page::PollRequest;
use crate::service::extract::enrich_row;
use crate::service::paged_reader::{LogStore, PagedReader};
use crate::service::tail::{TailPoller, TailSource};
use log::debug;
use std::sync::Arc;

/// Table served by dump queries
pub const DUMP_TABLE: &str = "ErrorLog";
pub const DUMP_PAGING_FIELD: &str = "Timestamp";

/// Entry point for log queries. Dispatches on the query mode to the paged
/// reader or the tail poller.
#[derive(Clone)]
pub struct LogQuery {
    reader: PagedReader,
    poller: TailPoller,
}

impl LogQuery {
    pub fn new(store: Arc<dyn LogStore>, tail: Arc<dyn TailSource>) -> Self {
        Self {
            reader: PagedReader::new(store),
            poller: TailPoller::new(tail),
        }
    }

    pub fn query(&self, mode: QueryMode, params: &QueryParams) -> Result<QueryResponse> {
        debug!("Log query {:?} with {:?}", mode, params);

        match mode {
            QueryMode::Poll => {
                let request = PollRequest::parse(
                    params.id.as_deref(),
                    params.level.as_deref(),
                    params.pagesize.as_deref(),
                );
                Ok(QueryResponse::Entries(self.poller.poll(&request)))
            }
            QueryMode::Dump { pretty } => {
                let rows = self.reader.dump(
                    DUMP_TABLE,
                    Some(DUMP_PAGING_FIELD),
                    params.offset.as_deref(),
                    params.pagesize.as_deref(),
                )?;

                if pretty {
                    Ok(QueryResponse::Extracted(
                        rows.into_iter().map(enrich_row).collect(),
                    ))
                } else {
                    Ok(QueryResponse::Rows(rows))
                }
            }
        }
    }
}
