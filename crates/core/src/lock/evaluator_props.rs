//! Property-based tests for the lock evaluator.
//!
//! Randomized company chains, lock tables, and exception sets; the
//! properties pin the evaluator's authorization semantics.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use ledgerlock_shared::types::{CompanyId, LockExceptionId, UserId};
use proptest::prelude::*;
use uuid::Uuid;

use crate::company::{Company, CompanyStore};
use crate::exception::{ExceptionState, ExceptionStore, LockException};
use crate::lock::classifier::gated_kinds;
use crate::lock::evaluator::{effective_lock_date, may_modify};
use crate::lock::types::{LockKind, SOFT_LOCK_KINDS};
use crate::moves::{Move, MoveKind};

fn base_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn user(n: u128) -> UserId {
    UserId::from_uuid(Uuid::from_u128(n))
}

/// Per-level lock table in generated fixtures.
#[derive(Debug, Clone)]
struct LevelLocks {
    fiscalyear: Option<NaiveDate>,
    tax: Option<NaiveDate>,
    sale: Option<NaiveDate>,
    purchase: Option<NaiveDate>,
    hard: Option<NaiveDate>,
}

/// Generated exception, positioned by chain level.
#[derive(Debug, Clone)]
struct GenException {
    level: usize,
    user_id: Option<UserId>,
    kind: LockKind,
    relaxed_date: Option<NaiveDate>,
    end_offset_hours: i64,
    revoked: bool,
}

#[derive(Debug)]
struct Fixture {
    companies: CompanyStore,
    exceptions: ExceptionStore,
    /// Chain ids, leaf first.
    chain: Vec<CompanyId>,
}

impl Fixture {
    fn build(levels: &[LevelLocks], exceptions: &[GenException]) -> Self {
        let mut companies = CompanyStore::new();
        let mut chain_root_first = Vec::new();
        let mut parent: Option<CompanyId> = None;
        for (i, locks) in levels.iter().enumerate() {
            let mut company = match parent {
                None => Company::new(format!("level-{i}")),
                Some(parent_id) => Company::branch_of(parent_id, format!("level-{i}")),
            };
            company.lock_dates.fiscalyear = locks.fiscalyear;
            company.lock_dates.tax = locks.tax;
            company.lock_dates.sale = locks.sale;
            company.lock_dates.purchase = locks.purchase;
            company.lock_dates.hard = locks.hard;
            parent = Some(company.id);
            chain_root_first.push(company.id);
            companies.insert(company);
        }

        let mut store = ExceptionStore::new();
        for e in exceptions {
            let company_id = chain_root_first[e.level % chain_root_first.len()];
            store.insert(LockException {
                id: LockExceptionId::new(),
                company_id,
                user_id: e.user_id,
                kind: e.kind,
                relaxed_date: e.relaxed_date,
                end_datetime: base_now() + Duration::hours(e.end_offset_hours),
                state: if e.revoked {
                    ExceptionState::Revoked
                } else {
                    ExceptionState::Active
                },
                lock_date_snapshot: None,
                reason: None,
                created_at: base_now(),
            });
        }

        let mut chain = chain_root_first;
        chain.reverse();
        Self {
            companies,
            exceptions: store,
            chain,
        }
    }

    fn leaf(&self) -> CompanyId {
        self.chain[0]
    }
}

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (2000i32..=2030, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn arb_opt_date() -> impl Strategy<Value = Option<NaiveDate>> {
    prop_oneof![2 => Just(None), 3 => arb_date().prop_map(Some)]
}

fn arb_level() -> impl Strategy<Value = LevelLocks> {
    (
        arb_opt_date(),
        arb_opt_date(),
        arb_opt_date(),
        arb_opt_date(),
        arb_opt_date(),
    )
        .prop_map(|(fiscalyear, tax, sale, purchase, hard)| LevelLocks {
            fiscalyear,
            tax,
            sale,
            purchase,
            hard,
        })
}

fn arb_soft_kind() -> impl Strategy<Value = LockKind> {
    prop_oneof![
        Just(LockKind::Fiscalyear),
        Just(LockKind::Tax),
        Just(LockKind::Sale),
        Just(LockKind::Purchase),
    ]
}

fn arb_move_kind() -> impl Strategy<Value = MoveKind> {
    prop_oneof![
        Just(MoveKind::CustomerInvoice),
        Just(MoveKind::CustomerRefund),
        Just(MoveKind::VendorInvoice),
        Just(MoveKind::VendorRefund),
        Just(MoveKind::MiscEntry),
    ]
}

fn arb_exception() -> impl Strategy<Value = GenException> {
    (
        0usize..3,
        prop_oneof![Just(None), (1u128..=3).prop_map(|n| Some(user(n)))],
        arb_soft_kind(),
        arb_opt_date(),
        -48i64..=48,
        any::<bool>(),
    )
        .prop_map(
            |(level, user_id, kind, relaxed_date, end_offset_hours, revoked)| GenException {
                level,
                user_id,
                kind,
                relaxed_date,
                end_offset_hours,
                revoked,
            },
        )
}

fn arb_fixture() -> impl Strategy<Value = Fixture> {
    (
        proptest::collection::vec(arb_level(), 1..=3),
        proptest::collection::vec(arb_exception(), 0..=6),
    )
        .prop_map(|(levels, exceptions)| Fixture::build(&levels, &exceptions))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// A move dated on or before any ancestor's hard lock is denied for
    /// every user, regardless of exceptions.
    #[test]
    fn prop_hard_lock_admits_no_exception(
        levels in proptest::collection::vec(arb_level(), 1..=3),
        hard_level in 0usize..3,
        hard_date in arb_date(),
        move_kind in arb_move_kind(),
        days_before in 0i64..=400,
        user_n in 1u128..=3,
    ) {
        let mut levels = levels;
        let idx = hard_level % levels.len();
        levels[idx].hard = Some(hard_date);

        // Blanket unlimited exceptions on every level and soft kind: only
        // the hard lock can deny.
        let exceptions: Vec<GenException> = (0..levels.len())
            .flat_map(|level| {
                SOFT_LOCK_KINDS.into_iter().map(move |kind| GenException {
                    level,
                    user_id: None,
                    kind,
                    relaxed_date: None,
                    end_offset_hours: 48,
                    revoked: false,
                })
            })
            .collect();

        let fixture = Fixture::build(&levels, &exceptions);
        let date = hard_date - Duration::days(days_before);
        let mv = Move::draft(fixture.leaf(), date, move_kind);

        let result = may_modify(
            &fixture.companies,
            &fixture.exceptions,
            &mv,
            user(user_n),
            base_now(),
        );
        prop_assert!(result.is_err(), "hard-locked move must be denied");
        let err = result.unwrap_err();
        prop_assert_eq!(err.blocking_kind(), Some(LockKind::Hard));
    }

    /// An exception on a kind the move is not gated by never changes the
    /// decision.
    #[test]
    fn prop_unrelated_kind_never_relieves(
        fixture in arb_fixture(),
        move_kind in arb_move_kind(),
        date in arb_date(),
        extra_relaxed in arb_opt_date(),
        user_n in 1u128..=3,
    ) {
        let mv = Move::draft(fixture.leaf(), date, move_kind);
        let u = user(user_n);

        let unrelated = SOFT_LOCK_KINDS
            .into_iter()
            .find(|k| !gated_kinds(move_kind).contains(k));
        prop_assume!(unrelated.is_some());
        let unrelated = unrelated.unwrap();

        let before = may_modify(&fixture.companies, &fixture.exceptions, &mv, u, base_now());

        let mut widened = fixture.exceptions.clone();
        widened.insert(LockException {
            id: LockExceptionId::new(),
            company_id: fixture.leaf(),
            user_id: None,
            kind: unrelated,
            relaxed_date: extra_relaxed,
            end_datetime: base_now() + Duration::hours(48),
            state: ExceptionState::Active,
            lock_date_snapshot: None,
            reason: None,
            created_at: base_now(),
        });
        let after = may_modify(&fixture.companies, &widened, &mv, u, base_now());

        prop_assert_eq!(before, after);
    }

    /// A global exception decides identically for every user.
    #[test]
    fn prop_global_exception_is_user_invariant(
        fixture in arb_fixture(),
        move_kind in arb_move_kind(),
        date in arb_date(),
    ) {
        // Make every generated exception global.
        let mut globals = ExceptionStore::new();
        for e in fixture.exceptions.iter() {
            let mut e = e.clone();
            e.user_id = None;
            globals.insert(e);
        }

        let mv = Move::draft(fixture.leaf(), date, move_kind);
        let first = may_modify(&fixture.companies, &globals, &mv, user(1), base_now());
        for n in 2u128..=4 {
            let other = may_modify(&fixture.companies, &globals, &mv, user(n), base_now());
            prop_assert_eq!(first.clone(), other);
        }
    }

    /// An exception scoped to one user never changes another user's
    /// decision.
    #[test]
    fn prop_user_scoped_exception_is_invisible_to_others(
        fixture in arb_fixture(),
        move_kind in arb_move_kind(),
        date in arb_date(),
        relaxed in arb_opt_date(),
        kind in arb_soft_kind(),
    ) {
        let grantee = user(1);
        let bystander = user(2);
        let mv = Move::draft(fixture.leaf(), date, move_kind);

        let before = may_modify(&fixture.companies, &fixture.exceptions, &mv, bystander, base_now());

        let mut widened = fixture.exceptions.clone();
        widened.insert(LockException {
            id: LockExceptionId::new(),
            company_id: fixture.leaf(),
            user_id: Some(grantee),
            kind,
            relaxed_date: relaxed,
            end_datetime: base_now() + Duration::hours(48),
            state: ExceptionState::Active,
            lock_date_snapshot: None,
            reason: None,
            created_at: base_now(),
        });
        let after = may_modify(&fixture.companies, &widened, &mv, bystander, base_now());

        prop_assert_eq!(before, after);
    }

    /// Revoking an exception restores the decision taken before it existed.
    #[test]
    fn prop_create_then_revoke_is_identity(
        fixture in arb_fixture(),
        move_kind in arb_move_kind(),
        date in arb_date(),
        relaxed in arb_opt_date(),
        kind in arb_soft_kind(),
        user_n in 1u128..=3,
    ) {
        let u = user(user_n);
        let mv = Move::draft(fixture.leaf(), date, move_kind);

        let before = may_modify(&fixture.companies, &fixture.exceptions, &mv, u, base_now());

        let mut widened = fixture.exceptions.clone();
        let id = LockExceptionId::new();
        widened.insert(LockException {
            id,
            company_id: fixture.leaf(),
            user_id: Some(u),
            kind,
            relaxed_date: relaxed,
            end_datetime: base_now() + Duration::hours(48),
            state: ExceptionState::Active,
            lock_date_snapshot: None,
            reason: None,
            created_at: base_now(),
        });
        widened.revoke(id);
        let after = may_modify(&fixture.companies, &widened, &mv, u, base_now());

        prop_assert_eq!(before, after);
    }

    /// The move decision agrees with the effective lock dates: a move is
    /// modifiable exactly when its date is past the effective date of every
    /// gating kind.
    #[test]
    fn prop_decision_matches_effective_lock_dates(
        fixture in arb_fixture(),
        move_kind in arb_move_kind(),
        date in arb_date(),
        user_n in 1u128..=3,
    ) {
        let u = user(user_n);
        let mv = Move::draft(fixture.leaf(), date, move_kind);

        let decision = may_modify(&fixture.companies, &fixture.exceptions, &mv, u, base_now());
        let unblocked = gated_kinds(move_kind).iter().all(|&kind| {
            effective_lock_date(
                &fixture.companies,
                &fixture.exceptions,
                fixture.leaf(),
                u,
                kind,
                base_now(),
                false,
            )
            .is_none_or(|effective| date > effective)
        });

        prop_assert_eq!(decision.is_ok(), unblocked);
    }

    /// Ignoring exceptions never reports an earlier effective lock date.
    #[test]
    fn prop_exceptions_only_relax(
        fixture in arb_fixture(),
        kind in arb_soft_kind(),
        user_n in 1u128..=3,
    ) {
        let with = effective_lock_date(
            &fixture.companies,
            &fixture.exceptions,
            fixture.leaf(),
            user(user_n),
            kind,
            base_now(),
            false,
        );
        let without = effective_lock_date(
            &fixture.companies,
            &fixture.exceptions,
            fixture.leaf(),
            user(user_n),
            kind,
            base_now(),
            true,
        );

        match (with, without) {
            (None, None) => {}
            (None, Some(_)) => {}
            (Some(w), Some(wo)) => prop_assert!(w <= wo),
            (Some(_), None) => prop_assert!(false, "exception invented a lock date"),
        }
    }
}
