//! Integration tests for the ride lifecycle around dispatch: intake, the
//! chair's progress reports, evaluation and payment.

mod common;

use crate::common::*;
use dispatch_core::common::{Coordinate, OwnerId, UserId};
use dispatch_core::domains::accounts::Owner;
use dispatch_core::domains::chairs::actions::{
    list_owner_chairs, post_ride_status, register_chair, report_location, set_activity,
};
use dispatch_core::domains::chairs::ChairError;
use dispatch_core::domains::matching::MatchOutcome;
use dispatch_core::domains::ride_status::RideStatusLabel;
use dispatch_core::domains::rides::actions::{create_ride, evaluate_ride, list_rides};
use dispatch_core::domains::rides::{Ride, RideError};
use dispatch_core::kernel::{ChargeCall, MockPaymentGateway};
use test_context::test_context;

use RideStatusLabel::*;

const PICKUP: Coordinate = Coordinate {
    latitude: 5,
    longitude: 5,
};
const DESTINATION: Coordinate = Coordinate {
    latitude: 10,
    longitude: 10,
};

#[test_context(TestHarness)]
#[tokio::test]
async fn one_unfinished_ride_per_requester(ctx: &TestHarness) {
    let kernel = ctx.kernel();
    let user = create_user(&ctx.db_pool).await.unwrap();

    create_ride(user, PICKUP, DESTINATION, &kernel).await.unwrap();
    let second = create_ride(user, PICKUP, DESTINATION, &kernel).await;

    assert!(matches!(second, Err(RideError::RideInProgress)));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn unknown_requester_cannot_request_a_ride(ctx: &TestHarness) {
    let kernel = ctx.kernel();
    let result = create_ride(UserId::new(), PICKUP, DESTINATION, &kernel).await;
    assert!(matches!(result, Err(RideError::UserNotFound(_))));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn ride_runs_from_request_to_payment(ctx: &TestHarness) {
    let kernel = ctx.kernel();
    let user = create_user(&ctx.db_pool).await.unwrap();
    let chair = create_active_chair(&ctx.db_pool, Coordinate::new(0, 0)).await.unwrap();
    let ride = create_ride(user, PICKUP, DESTINATION, &kernel).await.unwrap();
    assert_eq!(ride.fare(), 1500);

    let outcome = kernel.matching.run_once().await.unwrap();
    assert_eq!(
        outcome,
        MatchOutcome::Matched {
            ride_id: ride.id,
            chair_id: chair
        }
    );

    post_ride_status(chair, ride.id, Enroute, &kernel).await.unwrap();
    report_location(chair, Coordinate::new(3, 3), &kernel).await.unwrap();
    assert_eq!(kernel.ride_status.latest_status(ride.id).await.unwrap(), Enroute);
    report_location(chair, PICKUP, &kernel).await.unwrap();
    assert_eq!(kernel.ride_status.latest_status(ride.id).await.unwrap(), Pickup);
    post_ride_status(chair, ride.id, Carrying, &kernel).await.unwrap();
    report_location(chair, DESTINATION, &kernel).await.unwrap();
    assert_eq!(kernel.ride_status.latest_status(ride.id).await.unwrap(), Arrived);

    let evaluated = evaluate_ride(ride.id, 5, &kernel).await.unwrap();

    assert_eq!(evaluated.fare, 1500);
    assert_eq!(kernel.ride_status.latest_status(ride.id).await.unwrap(), Completed);
    let labels: Vec<_> = kernel
        .ride_status
        .history(ride.id)
        .await
        .unwrap()
        .iter()
        .map(|s| s.status)
        .collect();
    assert_eq!(labels, RideStatusLabel::LIFECYCLE.to_vec());
    assert_eq!(
        ctx.payments.calls(),
        vec![ChargeCall {
            token: format!("token-{}", user),
            amount: 1500,
            expected_payments: 1,
        }]
    );
    let stored = Ride::find_by_id(ride.id, &ctx.db_pool).await.unwrap().unwrap();
    assert_eq!(stored.evaluation, Some(5));

    // The requester may ride again, and the chair is free to take it.
    let next = create_ride(user, DESTINATION, PICKUP, &kernel).await.unwrap();
    assert_eq!(
        kernel.matching.run_once().await.unwrap(),
        MatchOutcome::Matched {
            ride_id: next.id,
            chair_id: chair
        }
    );
    let history = list_rides(user, &kernel).await.unwrap();
    assert_eq!(history.iter().map(|r| r.id).collect::<Vec<_>>(), vec![next.id, ride.id]);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn chair_cannot_skip_or_take_over_statuses(ctx: &TestHarness) {
    let kernel = ctx.kernel();
    let user = create_user(&ctx.db_pool).await.unwrap();
    let chair = create_active_chair(&ctx.db_pool, Coordinate::new(0, 0)).await.unwrap();
    let ride = create_ride(user, PICKUP, DESTINATION, &kernel).await.unwrap();
    kernel.matching.run_once().await.unwrap();

    let skipped = post_ride_status(chair, ride.id, Carrying, &kernel).await;
    assert!(matches!(
        skipped,
        Err(ChairError::UnexpectedStatus {
            expected: Pickup,
            actual: Some(Matched)
        })
    ));

    let forbidden = post_ride_status(chair, ride.id, Completed, &kernel).await;
    assert!(matches!(forbidden, Err(ChairError::StatusNotAllowed(Completed))));

    let other = create_active_chair(&ctx.db_pool, Coordinate::new(9, 9)).await.unwrap();
    let stranger = post_ride_status(other, ride.id, Enroute, &kernel).await;
    assert!(matches!(stranger, Err(ChairError::RideNotAssigned(_))));

    assert_eq!(kernel.ride_status.latest_status(ride.id).await.unwrap(), Matched);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn evaluation_requires_arrival_and_a_valid_score(ctx: &TestHarness) {
    let kernel = ctx.kernel();
    let user = create_user(&ctx.db_pool).await.unwrap();
    let chair = create_active_chair(&ctx.db_pool, Coordinate::new(0, 0)).await.unwrap();
    let ride = create_ride(user, PICKUP, DESTINATION, &kernel).await.unwrap();
    kernel.matching.run_once().await.unwrap();
    post_ride_status(chair, ride.id, Enroute, &kernel).await.unwrap();

    let early = evaluate_ride(ride.id, 4, &kernel).await;
    assert!(matches!(
        early,
        Err(RideError::UnexpectedStatus {
            expected: Arrived,
            actual: Some(Enroute)
        })
    ));

    let out_of_range = evaluate_ride(ride.id, 6, &kernel).await;
    assert!(matches!(out_of_range, Err(RideError::InvalidEvaluation(6))));
    assert!(ctx.payments.calls().is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn failed_payment_leaves_ride_arrived(ctx: &TestHarness) {
    let gateway = MockPaymentGateway::failing();
    let kernel = ctx
        .deps()
        .mock_payments(gateway.clone())
        .into_kernel(ctx.db_pool.clone());
    let user = create_user(&ctx.db_pool).await.unwrap();
    let chair = create_active_chair(&ctx.db_pool, Coordinate::new(0, 0)).await.unwrap();
    let ride = create_ride(user, PICKUP, DESTINATION, &kernel).await.unwrap();
    kernel.matching.run_once().await.unwrap();
    post_ride_status(chair, ride.id, Enroute, &kernel).await.unwrap();
    report_location(chair, PICKUP, &kernel).await.unwrap();
    post_ride_status(chair, ride.id, Carrying, &kernel).await.unwrap();
    report_location(chair, DESTINATION, &kernel).await.unwrap();

    let result = evaluate_ride(ride.id, 3, &kernel).await;

    assert!(matches!(result, Err(RideError::Payment(_))));
    assert_eq!(gateway.calls().len(), 1);
    assert_eq!(kernel.ride_status.latest_status(ride.id).await.unwrap(), Arrived);
    let stored = Ride::find_by_id(ride.id, &ctx.db_pool).await.unwrap().unwrap();
    assert_eq!(stored.evaluation, None);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn inactive_chair_keeps_its_ride_but_gets_no_new_one(ctx: &TestHarness) {
    let kernel = ctx.kernel();
    let chair = create_active_chair(&ctx.db_pool, Coordinate::new(0, 0)).await.unwrap();
    let first = create_pending_ride(&ctx.db_pool, PICKUP).await.unwrap();
    kernel.matching.run_once().await.unwrap();

    set_activity(chair, false, &kernel).await.unwrap();
    post_ride_status(chair, first, Enroute, &kernel).await.unwrap();
    let second = create_pending_ride(&ctx.db_pool, PICKUP).await.unwrap();

    assert_eq!(
        kernel.matching.run_once().await.unwrap(),
        MatchOutcome::NoEligibleChair { ride_id: second }
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn requester_and_chair_each_receive_every_event(ctx: &TestHarness) {
    let kernel = ctx.kernel();
    let user = create_user(&ctx.db_pool).await.unwrap();
    let chair = create_active_chair(&ctx.db_pool, Coordinate::new(0, 0)).await.unwrap();
    let ride = create_ride(user, PICKUP, DESTINATION, &kernel).await.unwrap();

    assert!(kernel.ride_status.deliver_to_requester(ride.id).await.unwrap_err().is_not_found());

    kernel.matching.run_once().await.unwrap();
    post_ride_status(chair, ride.id, Enroute, &kernel).await.unwrap();

    for expected in [Matched, Enroute] {
        assert_eq!(kernel.ride_status.deliver_to_requester(ride.id).await.unwrap().status, expected);
        assert_eq!(kernel.ride_status.deliver_to_chair(ride.id).await.unwrap().status, expected);
    }
    assert!(kernel.ride_status.deliver_to_requester(ride.id).await.unwrap_err().is_not_found());
    assert!(kernel.ride_status.deliver_to_chair(ride.id).await.unwrap_err().is_not_found());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn owner_sees_chairs_with_their_last_location(ctx: &TestHarness) {
    let kernel = ctx.kernel();
    let owner = Owner::create("fleet", &ctx.db_pool).await.unwrap();
    let parked = register_chair(owner.id, "parked", "model-a", &kernel).await.unwrap();
    let moving = register_chair(owner.id, "moving", "model-b", &kernel).await.unwrap();
    report_location(moving.id, Coordinate::new(1, 1), &kernel).await.unwrap();
    report_location(moving.id, Coordinate::new(4, 2), &kernel).await.unwrap();

    let chairs = list_owner_chairs(owner.id, &kernel).await.unwrap();

    assert_eq!(chairs.len(), 2);
    assert_eq!(chairs[0].chair.id, parked.id);
    assert!(chairs[0].location.is_none());
    assert!(!chairs[0].chair.is_active);
    assert_eq!(chairs[1].chair.id, moving.id);
    let location = chairs[1].location.as_ref().unwrap();
    assert_eq!(location.coordinate(), Coordinate::new(4, 2));

    let missing = list_owner_chairs(OwnerId::new(), &kernel).await;
    assert!(matches!(missing, Err(ChairError::OwnerNotFound(_))));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn location_advances_older_ride_assigned_after_a_newer_one(ctx: &TestHarness) {
    let kernel = ctx.kernel();
    let chair = create_active_chair(&ctx.db_pool, Coordinate::new(0, 0)).await.unwrap();
    let older = create_pending_ride(&ctx.db_pool, PICKUP).await.unwrap();
    let newer = create_assigned_ride(
        &ctx.db_pool,
        &kernel.ride_status,
        chair,
        &RideStatusLabel::LIFECYCLE,
    )
    .await
    .unwrap();

    let mut conn = ctx.db_pool.acquire().await.unwrap();
    assert!(Ride::assign_chair(older, chair, &mut conn).await.unwrap());
    drop(conn);
    kernel.ride_status.append(older, Matched).await.unwrap();
    kernel.ride_status.append(older, Enroute).await.unwrap();

    report_location(chair, PICKUP, &kernel).await.unwrap();

    assert_eq!(kernel.ride_status.latest_status(older).await.unwrap(), Pickup);
    assert_eq!(kernel.ride_status.latest_status(newer).await.unwrap(), Completed);
}
