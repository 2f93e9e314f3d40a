//! Test helpers.

use std::sync::Arc;

use bookflow_app::{
    auth::{AuthSession, MockAuthService},
    context::AppContext,
    domain::{
        books::{
            MockCatalogService,
            models::{Book, BookUuid},
        },
        borrows::{
            MockBorrowsService,
            models::{BORROW_PERIOD, BorrowRecord, BorrowStatus, BorrowUuid, RENTAL_FEE},
        },
        lending::{
            MockLendingService,
            models::{Condition, LendSubmission, SubmissionStatus, SubmissionUuid},
        },
        orders::{
            MockOrdersService,
            models::{Order, OrderStatus, OrderUuid, ShippingAddress},
        },
        reports::MockReportsService,
        users::{
            MockUsersService,
            models::{Role, UserUuid},
        },
    },
};
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());
pub(crate) const TEST_ADMIN_UUID: UserUuid =
    UserUuid::from_uuid(Uuid::from_u128(0xadu128));

pub(crate) const TEST_USER_SESSION: AuthSession = AuthSession::new(TEST_USER_UUID, Role::User);
pub(crate) const TEST_ADMIN_SESSION: AuthSession = AuthSession::new(TEST_ADMIN_UUID, Role::Admin);

pub(crate) fn make_book(title: &str, author: &str) -> Book {
    Book {
        uuid: BookUuid::new(),
        title: title.to_string(),
        author: author.to_string(),
        price: 1999,
        stock_count: 3,
        borrowable_count: 1,
        img_url: None,
        created_at: jiff::Timestamp::UNIX_EPOCH,
        updated_at: jiff::Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_address() -> ShippingAddress {
    ShippingAddress {
        name: "Pat".to_string(),
        address: "1 High St".to_string(),
        city: "Leeds".to_string(),
        pincode: "LS1 1AA".to_string(),
    }
}

pub(crate) fn make_order(user_uuid: UserUuid, uuid: OrderUuid) -> Order {
    Order {
        uuid,
        user_uuid,
        customer_name: "Pat".to_string(),
        customer_email: "pat@example.com".to_string(),
        items: vec![],
        shipping: make_address(),
        total_price: 3998,
        status: OrderStatus::Processing,
        is_paid: true,
        created_at: jiff::Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_borrow(user_uuid: UserUuid, uuid: BorrowUuid) -> BorrowRecord {
    let borrow_date = jiff::Timestamp::UNIX_EPOCH;

    BorrowRecord {
        uuid,
        user_uuid,
        borrower_name: "Pat".to_string(),
        borrower_email: "pat@example.com".to_string(),
        book_uuid: BookUuid::new(),
        title: "Dune".to_string(),
        author: "Frank Herbert".to_string(),
        pickup: make_address(),
        borrow_date,
        due_date: borrow_date + BORROW_PERIOD,
        return_date: None,
        status: BorrowStatus::Reserved,
        deposit_amount: 999,
        rental_fee: RENTAL_FEE,
        is_deposit_refunded: false,
        is_returned_in_good_condition: None,
        created_at: borrow_date,
    }
}

pub(crate) fn make_submission(lender_uuid: UserUuid, uuid: SubmissionUuid) -> LendSubmission {
    LendSubmission {
        uuid,
        lender_uuid,
        title: "Dune".to_string(),
        author: "Frank Herbert".to_string(),
        isbn: "9780441013593".to_string(),
        edition: None,
        condition: Condition::Good,
        img_url: None,
        copies: 2,
        status: SubmissionStatus::PendingReview,
        reviewed_at: None,
        created_at: jiff::Timestamp::UNIX_EPOCH,
    }
}

/// One mock per application service. Unset mocks panic on first use, so a
/// handler test only fills in the services its route touches.
#[derive(Default)]
pub(crate) struct MockServices {
    pub catalog: MockCatalogService,
    pub orders: MockOrdersService,
    pub borrows: MockBorrowsService,
    pub lending: MockLendingService,
    pub users: MockUsersService,
    pub reports: MockReportsService,
    pub auth: MockAuthService,
}

impl MockServices {
    fn into_state(self) -> Arc<State> {
        Arc::new(State::new(AppContext {
            catalog: Arc::new(self.catalog),
            orders: Arc::new(self.orders),
            borrows: Arc::new(self.borrows),
            lending: Arc::new(self.lending),
            users: Arc::new(self.users),
            reports: Arc::new(self.reports),
            auth: Arc::new(self.auth),
        }))
    }
}

struct SessionInjector(AuthSession);

#[salvo::async_trait]
impl Handler for SessionInjector {
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        ctrl: &mut FlowCtrl,
    ) {
        depot.insert_auth_session(self.0);
        ctrl.call_next(req, depot, res).await;
    }
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    MockServices {
        auth,
        ..MockServices::default()
    }
    .into_state()
}

/// A service without the bearer middleware, for public routes.
pub(crate) fn public_service(mocks: MockServices, route: Router) -> Service {
    Service::new(Router::new().hoop(inject(mocks.into_state())).push(route))
}

/// A service with `session` already established, as the bearer middleware
/// would have left it.
pub(crate) fn authed_service(mocks: MockServices, session: AuthSession, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(mocks.into_state()))
            .hoop(SessionInjector(session))
            .push(route),
    )
}
