//! Controller for a paginated result view.
//!
//! `ResultBrowser` owns the single live [`PageState`] and the currently
//! displayed batch. Page changes go through fetch tickets carrying a
//! monotonically increasing sequence number, so an out-of-order response
//! from a superseded request can never overwrite a newer view.

use tracing::debug;

use crate::entities::HitPage;
use crate::error::GenedexError;
use crate::pager::PageState;
use crate::sources::searchidx::SearchIndexClient;
use crate::transform;
use crate::utils::query::Query;

/// A page-selection action from the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMove {
    Page(usize),
    Next,
    Prev,
    Resize(usize),
}

/// Outcome of applying a fetched batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Committed,
    Stale,
}

/// Handle for one in-flight page fetch.
///
/// Only the latest issued ticket can commit; older tickets are
/// discarded on apply (newest request wins).
#[derive(Debug, Clone, Copy)]
pub struct FetchTicket {
    seq: u64,
    state: PageState,
}

impl FetchTicket {
    /// The page state this fetch was issued for.
    pub fn state(&self) -> PageState {
        self.state
    }
}

pub struct ResultBrowser {
    client: SearchIndexClient,
    query: Query,
    db: String,
    state: PageState,
    view: Option<HitPage>,
    last_issued: u64,
}

impl ResultBrowser {
    /// Opens a result view: one count request seeds the hit total and
    /// page 1 is current. No page is fetched yet.
    pub async fn open(
        client: SearchIndexClient,
        query: Query,
        db: String,
        page_size: usize,
    ) -> Result<Self, GenedexError> {
        let count = client.count(&query, &db).await?;
        Ok(Self {
            client,
            query,
            db,
            state: PageState::new(count.count, page_size),
            view: None,
            last_issued: 0,
        })
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    pub fn view(&self) -> Option<&HitPage> {
        self.view.as_ref()
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    fn target(&self, mv: PageMove) -> PageState {
        match mv {
            PageMove::Page(page) => self.state.goto(page),
            PageMove::Next => self.state.next(),
            PageMove::Prev => self.state.prev(),
            PageMove::Resize(size) => self.state.resize(size),
        }
    }

    /// Computes the target state for a move and issues a fetch ticket,
    /// superseding any ticket issued earlier.
    pub fn begin(&mut self, mv: PageMove) -> FetchTicket {
        let state = self.target(mv);
        self.last_issued += 1;
        FetchTicket {
            seq: self.last_issued,
            state,
        }
    }

    /// Commits a fetched batch unless a newer fetch was issued since the
    /// ticket. Totals reported by the page response re-clamp the pager.
    pub fn apply(&mut self, ticket: FetchTicket, page: HitPage) -> Applied {
        if ticket.seq != self.last_issued {
            debug!(
                seq = ticket.seq,
                latest = self.last_issued,
                "Discarding stale page response"
            );
            return Applied::Stale;
        }
        self.state = ticket.state.update_total(page.total);
        self.view = Some(page);
        Applied::Committed
    }

    /// One full page change: window recompute, fetch, commit.
    ///
    /// A move that lands on the already-displayed state (Next at the
    /// last page, Prev at page 1, the current page's own number) is a
    /// no-op and issues no request. On a fetch error nothing is
    /// committed; the previous view and state stay valid for retry.
    pub async fn select(&mut self, mv: PageMove) -> Result<&HitPage, GenedexError> {
        let target = self.target(mv);
        if self.view.is_some() && target == self.state {
            return self.current_view();
        }

        let ticket = self.begin(mv);
        let resp = self
            .client
            .page(
                &self.query,
                &self.db,
                ticket.state.offset(),
                ticket.state.page_size(),
            )
            .await?;
        self.apply(ticket, transform::hit::from_response(resp));
        self.current_view()
    }

    fn current_view(&self) -> Result<&HitPage, GenedexError> {
        self.view.as_ref().ok_or_else(|| GenedexError::Api {
            api: "browser".into(),
            message: "No result page has been loaded".into(),
        })
    }
}
