//! Data hooks over the REST services.
//!
//! [`use_resource`] fetches on mount and whenever its dependencies change by
//! value. Each request is numbered; only the newest response is applied, and
//! a failed request keeps the previous data while recording the error.

use std::future::Future;
use std::rc::Rc;

use maintdesk_shared::fetch::{FetchSequencer, FetchState, MutationState};
use maintdesk_shared::query::{TicketFilters, UserQuery};
use maintdesk_shared::{
    AdminDashboard, ApiError, ApiResult, Comment, Facility, FacilityInput, NewUser, Page,
    ReportType, Section, SectionInput, TechnicianPerformance, Ticket, TicketAnalytics, User,
    UserUpdate,
};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_hooks::use_is_mounted;

use crate::services::{analytics, facilities, reports, sections, technicians, tickets, users};

// ============================================
// FETCHING
// ============================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceHandle<T> {
    pub data: T,
    pub loading: bool,
    pub error: Option<ApiError>,
    pub refetch: Callback<()>,
}

#[derive(PartialEq)]
struct ResourceState<T>(FetchState<T>);

impl<T: Default> Default for ResourceState<T> {
    fn default() -> Self {
        Self(FetchState::default())
    }
}

enum ResourceAction<T> {
    Start(u64),
    Finish(u64, ApiResult<T>),
}

impl<T: Clone> Reducible for ResourceState<T> {
    type Action = ResourceAction<T>;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = self.0.clone();
        match action {
            ResourceAction::Start(seq) => next.start(seq),
            ResourceAction::Finish(seq, outcome) => {
                if !next.finish(seq, outcome) {
                    return self;
                }
            }
        }
        Rc::new(Self(next))
    }
}

#[derive(Default, PartialEq)]
struct Generation(u32);

impl Reducible for Generation {
    type Action = ();

    fn reduce(self: Rc<Self>, _: ()) -> Rc<Self> {
        Rc::new(Self(self.0.wrapping_add(1)))
    }
}

#[hook]
pub fn use_resource<T, D, F, Fut>(deps: D, fetcher: F) -> ResourceHandle<T>
where
    T: Clone + Default + PartialEq + 'static,
    D: Clone + PartialEq + 'static,
    F: FnOnce(D) -> Fut + 'static,
    Fut: Future<Output = ApiResult<T>> + 'static,
{
    let state = use_reducer(ResourceState::<T>::default);
    let sequencer = use_mut_ref(FetchSequencer::default);
    let generation = use_reducer(Generation::default);
    let is_mounted = use_is_mounted();

    {
        let state = state.clone();
        use_effect_with((deps, generation.0), move |(deps, _)| {
            let seq = sequencer.borrow_mut().next();
            state.dispatch(ResourceAction::Start(seq));
            let request = fetcher(deps.clone());
            spawn_local(async move {
                let outcome = request.await;
                if is_mounted() {
                    state.dispatch(ResourceAction::Finish(seq, outcome));
                }
            });
            || ()
        });
    }

    let refetch = {
        let generation = generation.clone();
        Callback::from(move |_| generation.dispatch(()))
    };

    ResourceHandle {
        data: state.0.data.clone(),
        loading: state.0.loading,
        error: state.0.error.clone(),
        refetch,
    }
}

#[hook]
pub fn use_tickets(filters: TicketFilters) -> ResourceHandle<Page<Ticket>> {
    use_resource(filters, |filters| async move { tickets::list(&filters).await })
}

#[hook]
pub fn use_ticket(id: i64) -> ResourceHandle<Option<Ticket>> {
    use_resource(id, |id| async move { tickets::get(id).await.map(Some) })
}

#[hook]
pub fn use_ticket_comments(id: i64) -> ResourceHandle<Vec<Comment>> {
    use_resource(id, |id| async move { tickets::comments(id).await })
}

#[hook]
pub fn use_sections() -> ResourceHandle<Vec<Section>> {
    use_resource((), |_| sections::list())
}

#[hook]
pub fn use_facilities() -> ResourceHandle<Vec<Facility>> {
    use_resource((), |_| facilities::list())
}

#[hook]
pub fn use_users(query: UserQuery) -> ResourceHandle<Page<User>> {
    use_resource(query, |query| async move { users::list(&query).await })
}

#[hook]
pub fn use_technicians() -> ResourceHandle<Vec<User>> {
    use_resource((), |_| technicians::list())
}

#[hook]
pub fn use_ticket_analytics() -> ResourceHandle<TicketAnalytics> {
    use_resource((), |_| analytics::tickets())
}

#[hook]
pub fn use_technician_analytics() -> ResourceHandle<Vec<TechnicianPerformance>> {
    use_resource((), |_| analytics::technicians())
}

#[hook]
pub fn use_admin_dashboard() -> ResourceHandle<AdminDashboard> {
    use_resource((), |_| analytics::admin_dashboard())
}

#[hook]
pub fn use_report_types() -> ResourceHandle<Vec<ReportType>> {
    use_resource((), |_| reports::types())
}

// ============================================
// MUTATIONS
// ============================================

#[derive(PartialEq, Default)]
struct MutationCell(MutationState);

enum MutationAction {
    Begin,
    End(Option<ApiError>),
}

impl Reducible for MutationCell {
    type Action = MutationAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = self.0.clone();
        match action {
            MutationAction::Begin => next.begin(),
            MutationAction::End(error) => next.end(error),
        }
        Rc::new(Self(next))
    }
}

/// Shared `loading`/`error` flags for a group of write calls.
///
/// Results are returned to the caller, errors included, so forms can bind
/// field messages.
#[derive(Clone, PartialEq)]
pub struct MutationHandle {
    state: UseReducerHandle<MutationCell>,
}

impl MutationHandle {
    pub fn loading(&self) -> bool {
        self.state.0.loading()
    }

    pub fn error(&self) -> Option<ApiError> {
        self.state.0.error.clone()
    }

    async fn run<T>(&self, call: impl Future<Output = ApiResult<T>>) -> ApiResult<T> {
        self.state.dispatch(MutationAction::Begin);
        let outcome = call.await;
        self.state
            .dispatch(MutationAction::End(outcome.as_ref().err().cloned()));
        outcome
    }
}

#[hook]
fn use_mutation() -> MutationHandle {
    MutationHandle {
        state: use_reducer(MutationCell::default),
    }
}

#[derive(Clone, PartialEq)]
pub struct FacilityMutations(pub MutationHandle);

impl FacilityMutations {
    pub async fn create(&self, input: FacilityInput) -> ApiResult<Facility> {
        self.0.run(facilities::create(&input)).await
    }

    pub async fn update(&self, id: i64, input: FacilityInput) -> ApiResult<Facility> {
        self.0.run(facilities::update(id, &input)).await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        self.0.run(facilities::delete(id)).await
    }
}

#[hook]
pub fn use_manage_facilities() -> FacilityMutations {
    FacilityMutations(use_mutation())
}

#[derive(Clone, PartialEq)]
pub struct SectionMutations(pub MutationHandle);

impl SectionMutations {
    pub async fn create(&self, input: SectionInput) -> ApiResult<Section> {
        self.0.run(sections::create(&input)).await
    }

    pub async fn update(&self, id: i64, input: SectionInput) -> ApiResult<Section> {
        self.0.run(sections::update(id, &input)).await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        self.0.run(sections::delete(id)).await
    }
}

#[hook]
pub fn use_manage_sections() -> SectionMutations {
    SectionMutations(use_mutation())
}

#[derive(Clone, PartialEq)]
pub struct CreateUser(pub MutationHandle);

impl CreateUser {
    pub async fn call(&self, input: NewUser) -> ApiResult<User> {
        self.0.run(users::create(&input)).await
    }
}

#[hook]
pub fn use_create_user() -> CreateUser {
    CreateUser(use_mutation())
}

#[derive(Clone, PartialEq)]
pub struct UpdateUser(pub MutationHandle);

impl UpdateUser {
    pub async fn call(&self, id: i64, update: UserUpdate) -> ApiResult<User> {
        self.0.run(users::update(id, &update)).await
    }
}

#[hook]
pub fn use_update_user() -> UpdateUser {
    UpdateUser(use_mutation())
}
