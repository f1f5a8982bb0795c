use std::fmt;

use crate::config::SplitOrder;
use crate::document::MemberDocument;
use crate::error::{OperationError, Result};
use crate::geometry::AxisCurve;
use crate::kernel::GeometryAdapter;
use crate::math::{is_interior_parameter, Point3};
use crate::operations::query::ProjectParameter;
use crate::report::{round_to, Report};

/// Progress of one member through splitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitState {
    /// No split point has been validated yet.
    Unsplit,
    /// At least one point lies strictly inside the member.
    Analyzed,
    /// Splits are being issued.
    Splitting,
    /// Every point has been processed.
    Done,
}

/// What happened to one split point.
#[derive(Debug, Clone, PartialEq)]
pub enum PointOutcome<Id> {
    /// The point split `target` at `parameter`, creating `new_member`.
    Split {
        point: Point3,
        target: Id,
        parameter: f64,
        new_member: Id,
    },
    /// No live segment contains the point.
    Unassigned { point: Point3 },
    /// The document rejected the split.
    Failed {
        point: Point3,
        target: Id,
        parameter: f64,
        reason: String,
    },
}

/// A point proven to lie strictly inside a member, as a normalized parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitCandidate<Id> {
    pub member: Id,
    pub parameter: f64,
}

/// A member piece that exists right now, with its axis as last read back
/// from the document.
#[derive(Debug, Clone)]
pub struct LiveSegment<Id> {
    pub member: Id,
    pub curve: Option<AxisCurve>,
}

/// Result of splitting one member.
#[derive(Debug, Clone)]
pub struct MemberSplit<Id> {
    pub member: Id,
    pub state: SplitState,
    /// Outcome per point, in processing order.
    pub outcomes: Vec<PointOutcome<Id>>,
    /// Every piece of the member, starting with the original id.
    pub segments: Vec<Id>,
}

impl<Id> MemberSplit<Id> {
    /// Number of splits the document accepted.
    #[must_use]
    pub fn splits_performed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, PointOutcome::Split { .. }))
            .count()
    }
}

/// Splits one member at a set of points.
///
/// Each split replaces a piece's domain, so a point's parameter on the
/// original axis says nothing about the pieces. Before every split the point
/// is projected afresh onto each live piece, in creation order, and the
/// first piece that holds it strictly inside becomes the target. The pieces'
/// axes are re-read from the document after every split.
pub struct SplitMember<Id> {
    member: Id,
    points: Vec<Point3>,
    order: SplitOrder,
    epsilon: f64,
    state: SplitState,
}

impl<Id: Copy + Eq + fmt::Debug> SplitMember<Id> {
    /// Creates a new `SplitMember` operation over already deduplicated points.
    #[must_use]
    pub fn new(member: Id, points: Vec<Point3>, order: SplitOrder, epsilon: f64) -> Self {
        Self {
            member,
            points,
            order,
            epsilon,
            state: SplitState::Unsplit,
        }
    }

    /// The member being split.
    #[must_use]
    pub fn member(&self) -> Id {
        self.member
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> SplitState {
        self.state
    }

    /// Points in the order they will be processed.
    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Validates the points against the member's original axis and orders
    /// them. Returns the valid normalized parameters, ascending.
    ///
    /// The member becomes [`SplitState::Analyzed`] if any parameter is valid.
    pub fn analyze(
        &mut self,
        original: &AxisCurve,
        kernel: &impl GeometryAdapter,
        report: &mut Report,
    ) -> Vec<f64> {
        let mut keyed = Vec::with_capacity(self.points.len());
        let mut valid = Vec::new();

        for point in &self.points {
            let key = match ProjectParameter::new(original, *point).execute_with_raw(kernel) {
                Ok((raw, t)) => {
                    let accepted = is_interior_parameter(t, self.epsilon);
                    report.log(format!(
                        "  Point ({}, {}, {}): raw_param={}, normalized={} -> {}",
                        round_to(point.x, 1),
                        round_to(point.y, 1),
                        round_to(point.z, 1),
                        round_to(raw, 4),
                        round_to(t, 4),
                        if accepted {
                            "ACCEPTED"
                        } else {
                            "REJECTED (outside valid range)"
                        },
                    ));
                    if accepted {
                        valid.push(t);
                    }
                    t
                }
                Err(err) => {
                    report.warn(format!(
                        "  WARNING: Could not project point ({}, {}, {}) onto member {:?}: {err}",
                        round_to(point.x, 1),
                        round_to(point.y, 1),
                        round_to(point.z, 1),
                        self.member,
                    ));
                    f64::NEG_INFINITY
                }
            };
            let key = match self.order {
                SplitOrder::AlongAxis => key,
                SplitOrder::DescendingX => point.x,
            };
            keyed.push((key, *point));
        }

        keyed.sort_by(|a, b| b.0.total_cmp(&a.0));
        self.points = keyed.into_iter().map(|(_, pt)| pt).collect();

        valid.sort_by(f64::total_cmp);
        if !valid.is_empty() {
            self.state = SplitState::Analyzed;
        }
        valid
    }

    /// Issues the splits. Per-point failures are recorded in the outcomes
    /// and do not stop the member.
    ///
    /// # Errors
    ///
    /// Returns an error if the member was not analyzed, or its axis cannot be
    /// read when splitting starts.
    pub fn execute<D>(
        &mut self,
        doc: &mut D,
        kernel: &impl GeometryAdapter,
        report: &mut Report,
    ) -> Result<MemberSplit<Id>>
    where
        D: MemberDocument<Id = Id>,
    {
        if self.state != SplitState::Analyzed {
            return Err(OperationError::InvalidInput(format!(
                "member {:?} has no analyzed split points",
                self.member
            ))
            .into());
        }

        let mut live = vec![LiveSegment {
            member: self.member,
            curve: Some(doc.axis_curve(self.member)?),
        }];
        self.state = SplitState::Splitting;

        let mut outcomes = Vec::with_capacity(self.points.len());
        for point in &self.points {
            let outcome = match self.route(point, &live, kernel, report) {
                None => {
                    report.warn(format!(
                        "  Point ({}, {}, {}) -> NOT found on any current member segment",
                        round_to(point.x, 1),
                        round_to(point.y, 1),
                        round_to(point.z, 1),
                    ));
                    PointOutcome::Unassigned { point: *point }
                }
                Some(SplitCandidate {
                    member: target,
                    parameter,
                }) => match doc.split(target, parameter) {
                    Ok(new_member) => {
                        report.log(format!(
                            "  SPLIT: Member {target:?} at param {} -> new member {new_member:?}",
                            round_to(parameter, 6)
                        ));
                        live.push(LiveSegment {
                            member: new_member,
                            curve: None,
                        });
                        refresh(&mut live, &*doc, report);
                        PointOutcome::Split {
                            point: *point,
                            target,
                            parameter,
                            new_member,
                        }
                    }
                    Err(err) => {
                        report.warn(format!(
                            "  ERROR splitting member {target:?} at param {}: {err}",
                            round_to(parameter, 6)
                        ));
                        PointOutcome::Failed {
                            point: *point,
                            target,
                            parameter,
                            reason: err.to_string(),
                        }
                    }
                },
            };
            outcomes.push(outcome);
        }

        self.state = SplitState::Done;
        Ok(MemberSplit {
            member: self.member,
            state: self.state,
            outcomes,
            segments: live.into_iter().map(|seg| seg.member).collect(),
        })
    }

    /// Finds the first live segment holding `point` strictly inside.
    fn route(
        &self,
        point: &Point3,
        live: &[LiveSegment<Id>],
        kernel: &impl GeometryAdapter,
        report: &mut Report,
    ) -> Option<SplitCandidate<Id>> {
        for segment in live {
            let Some(curve) = &segment.curve else {
                continue;
            };
            match ProjectParameter::new(curve, *point).execute(kernel) {
                Ok(t) if is_interior_parameter(t, self.epsilon) => {
                    report.log(format!(
                        "  Point ({}, {}, {}) -> belongs to member {:?} (param={})",
                        round_to(point.x, 1),
                        round_to(point.y, 1),
                        round_to(point.z, 1),
                        segment.member,
                        round_to(t, 6),
                    ));
                    return Some(SplitCandidate {
                        member: segment.member,
                        parameter: t,
                    });
                }
                Ok(t) => report.log(format!(
                    "  Point ({}, {}, {}) on member {:?} param={} (outside range)",
                    round_to(point.x, 1),
                    round_to(point.y, 1),
                    round_to(point.z, 1),
                    segment.member,
                    round_to(t, 6),
                )),
                Err(err) => report.warn(format!(
                    "  Point ({}, {}, {}) - projection on member {:?} failed: {err}",
                    round_to(point.x, 1),
                    round_to(point.y, 1),
                    round_to(point.z, 1),
                    segment.member,
                )),
            }
        }
        None
    }
}

/// Re-reads every live segment's axis from the document. A segment whose
/// axis cannot be read is kept but no longer receives points.
fn refresh<D: MemberDocument>(live: &mut [LiveSegment<D::Id>], doc: &D, report: &mut Report) {
    for segment in live {
        segment.curve = match doc.axis_curve(segment.member) {
            Ok(curve) => Some(curve),
            Err(err) => {
                report.warn(format!(
                    "  WARNING: Could not read axis of member {:?}: {err}",
                    segment.member
                ));
                None
            }
        };
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::document::{MemberData, MemberId, MemberStore};
    use crate::error::{DocumentError, GeometryError};
    use crate::geometry::CurveEnd;
    use crate::kernel::{IntersectionResult, LinearKernel};
    use crate::math::PARAMETER_EPSILON;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn store_with(start: Point3, end: Point3) -> (MemberStore, MemberId) {
        let mut store = MemberStore::new();
        let id = store.add_member(MemberData::new(
            "B1",
            AxisCurve::from_points(start, end).unwrap(),
        ));
        store.begin_transaction().unwrap();
        (store, id)
    }

    fn split_all(
        store: &mut MemberStore,
        id: MemberId,
        points: Vec<Point3>,
        order: SplitOrder,
    ) -> MemberSplit<MemberId> {
        let kernel = LinearKernel::default();
        let mut report = Report::new(true);
        let original = store.axis_curve(id).unwrap();
        let mut op = SplitMember::new(id, points, order, PARAMETER_EPSILON);
        op.analyze(&original, &kernel, &mut report);
        op.execute(store, &kernel, &mut report).unwrap()
    }

    /// Sorted X extents of every piece.
    fn extents(store: &MemberStore, ids: &[MemberId]) -> Vec<(f64, f64)> {
        let mut spans: Vec<(f64, f64)> = ids
            .iter()
            .map(|id| {
                let c = store.axis_curve(*id).unwrap();
                let (a, b) = (c.start().x, c.end().x);
                (a.min(b), a.max(b))
            })
            .collect();
        spans.sort_by(|a, b| a.0.total_cmp(&b.0));
        spans
    }

    fn assert_pieces(spans: &[(f64, f64)], expected: &[(f64, f64)]) {
        assert_eq!(spans.len(), expected.len());
        for (got, want) in spans.iter().zip(expected) {
            assert_relative_eq!(got.0, want.0, epsilon = 1e-6);
            assert_relative_eq!(got.1, want.1, epsilon = 1e-6);
        }
    }

    #[test]
    fn analyze_orders_along_axis_descending() {
        let axis = AxisCurve::from_points(p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0)).unwrap();
        let mut op = SplitMember::new(
            0_u32,
            vec![p(2.0, 0.0, 0.0), p(8.0, 0.0, 0.0), p(5.0, 0.0, 0.0)],
            SplitOrder::AlongAxis,
            PARAMETER_EPSILON,
        );
        let params = op.analyze(&axis, &LinearKernel::default(), &mut Report::new(false));
        assert_eq!(op.state(), SplitState::Analyzed);
        assert_eq!(params.len(), 3);
        assert_relative_eq!(params[0], 0.2);
        let xs: Vec<f64> = op.points().iter().map(|pt| pt.x).collect();
        assert_eq!(xs, vec![8.0, 5.0, 2.0]);
    }

    #[test]
    fn analyze_without_interior_points_stays_unsplit() {
        let axis = AxisCurve::from_points(p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0)).unwrap();
        let mut op = SplitMember::new(
            0_u32,
            vec![p(12.0, 0.0, 0.0)],
            SplitOrder::AlongAxis,
            PARAMETER_EPSILON,
        );
        let mut report = Report::new(false);
        let params = op.analyze(&axis, &LinearKernel::default(), &mut report);
        assert!(params.is_empty());
        assert_eq!(op.state(), SplitState::Unsplit);
        assert_eq!(
            report.lines(),
            ["  Point (12, 0, 0): raw_param=12, normalized=1.2 -> REJECTED (outside valid range)"]
        );
    }

    #[test]
    fn execute_requires_analysis() {
        let (mut store, id) = store_with(p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0));
        let mut op = SplitMember::new(
            id,
            vec![p(5.0, 0.0, 0.0)],
            SplitOrder::AlongAxis,
            PARAMETER_EPSILON,
        );
        let mut report = Report::new(false);
        let result = op.execute(&mut store, &LinearKernel::default(), &mut report);
        assert!(result.is_err());
    }

    #[test]
    fn three_points_give_four_pieces() {
        let (mut store, id) = store_with(p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0));
        let result = split_all(
            &mut store,
            id,
            vec![p(2.0, 0.0, 0.0), p(8.0, 0.0, 0.0), p(5.0, 0.0, 0.0)],
            SplitOrder::AlongAxis,
        );
        assert_eq!(result.state, SplitState::Done);
        assert_eq!(result.splits_performed(), 3);
        assert_eq!(result.segments.len(), 4);
        assert_pieces(
            &extents(&store, &result.segments),
            &[(0.0, 2.0), (2.0, 5.0), (5.0, 8.0), (8.0, 10.0)],
        );
    }

    #[test]
    fn later_points_are_routed_to_new_pieces() {
        let (mut store, id) = store_with(p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0));
        let result = split_all(
            &mut store,
            id,
            vec![p(2.0, 0.0, 0.0), p(5.0, 0.0, 0.0), p(8.0, 0.0, 0.0)],
            SplitOrder::DescendingX,
        );
        // DescendingX on a +X member processes 8, 5, 2: all on the original.
        assert!(result.outcomes.iter().all(|o| matches!(
            o,
            PointOutcome::Split { target, .. } if *target == id
        )));

        let (mut store, id) = store_with(p(10.0, 0.0, 0.0), p(0.0, 0.0, 0.0));
        let result = split_all(
            &mut store,
            id,
            vec![p(2.0, 0.0, 0.0), p(5.0, 0.0, 0.0), p(8.0, 0.0, 0.0)],
            SplitOrder::DescendingX,
        );
        // On a -X member, descending X is ascending parameter: each split
        // lands on the piece split off by the previous one.
        let targets: Vec<MemberId> = result
            .outcomes
            .iter()
            .map(|o| match o {
                PointOutcome::Split { target, .. } => *target,
                other => panic!("unexpected outcome {other:?}"),
            })
            .collect();
        assert_eq!(targets[0], id);
        assert_eq!(targets[1], result.segments[1]);
        assert_eq!(targets[2], result.segments[2]);
        assert_pieces(
            &extents(&store, &result.segments),
            &[(0.0, 2.0), (2.0, 5.0), (5.0, 8.0), (8.0, 10.0)],
        );
    }

    #[test]
    fn routed_parameter_is_relative_to_the_piece() {
        let (mut store, id) = store_with(p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0));
        let points = vec![p(7.0, 0.0, 0.0), p(3.0, 0.0, 0.0)];
        let result = split_all(&mut store, id, points.clone(), SplitOrder::AlongAxis);
        let kernel = LinearKernel::default();

        // After the first split (at 7), the point at 3 lies inside the
        // shortened original [0, 7] only.
        let PointOutcome::Split { parameter, target, .. } = &result.outcomes[1] else {
            panic!("second point was not split");
        };
        assert_eq!(*target, id);
        assert_relative_eq!(*parameter, 3.0 / 7.0, epsilon = 1e-9);

        for piece in &result.segments {
            let curve = store.axis_curve(*piece).unwrap();
            let t = ProjectParameter::new(&curve, points[1]).execute(&kernel).unwrap();
            assert!(!is_interior_parameter(t, PARAMETER_EPSILON));
        }
        let head = store.axis_curve(id).unwrap();
        assert_relative_eq!(head.end_parameter(CurveEnd::End), 3.0);
    }

    #[test]
    fn point_off_every_piece_is_unassigned() {
        let (mut store, id) = store_with(p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0));
        let kernel = LinearKernel::default();
        let mut report = Report::new(false);
        let original = store.axis_curve(id).unwrap();
        let mut op = SplitMember::new(
            id,
            vec![p(5.0, 0.0, 0.0), p(5.00001, 0.0, 0.0)],
            SplitOrder::AlongAxis,
            PARAMETER_EPSILON,
        );
        op.analyze(&original, &kernel, &mut report);
        let result = op.execute(&mut store, &kernel, &mut report).unwrap();

        assert_eq!(result.splits_performed(), 1);
        assert!(matches!(result.outcomes[1], PointOutcome::Unassigned { .. }));
        assert!(report
            .lines()
            .iter()
            .any(|line| line.contains("NOT found on any current member segment")));
    }

    /// Document whose every split fails.
    struct RejectingStore(MemberStore);

    impl MemberDocument for RejectingStore {
        type Id = MemberId;

        fn axis_curve(&self, id: MemberId) -> Result<AxisCurve> {
            self.0.axis_curve(id)
        }

        fn split(&mut self, _id: MemberId, _parameter: f64) -> Result<MemberId> {
            Err(DocumentError::SplitFailed("member is pinned".into()).into())
        }

        fn begin_transaction(&mut self) -> Result<()> {
            self.0.begin_transaction()
        }

        fn commit_transaction(&mut self) -> Result<()> {
            self.0.commit_transaction()
        }
    }

    fn is_pinned_failure(outcome: &PointOutcome<MemberId>) -> bool {
        matches!(outcome, PointOutcome::Failed { reason, .. } if reason.contains("pinned"))
    }

    #[test]
    fn failed_split_does_not_stop_the_member() {
        let mut store = MemberStore::new();
        let id = store.add_member(MemberData::new(
            "B1",
            AxisCurve::from_points(p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0)).unwrap(),
        ));
        let mut doc = RejectingStore(store);
        let kernel = LinearKernel::default();
        let mut report = Report::new(false);
        let original = doc.axis_curve(id).unwrap();
        let mut op = SplitMember::new(
            id,
            vec![p(3.0, 0.0, 0.0), p(6.0, 0.0, 0.0)],
            SplitOrder::AlongAxis,
            PARAMETER_EPSILON,
        );
        op.analyze(&original, &kernel, &mut report);
        let result = op.execute(&mut doc, &kernel, &mut report).unwrap();

        assert_eq!(result.outcomes.len(), 2);
        assert!(result.outcomes.iter().all(is_pinned_failure));
        assert_eq!(result.segments, vec![id]);
        assert_eq!(result.state, SplitState::Done);
    }

    /// Kernel whose projections fail for every curve ending at raw
    /// parameter `broken_end`.
    struct BrokenProjection {
        broken_end: f64,
    }

    impl GeometryAdapter for BrokenProjection {
        fn intersect(&self, a: &AxisCurve, b: &AxisCurve) -> Result<IntersectionResult> {
            LinearKernel::default().intersect(a, b)
        }

        fn project(&self, curve: &AxisCurve, point: &Point3) -> Result<f64> {
            if (curve.end_parameter(CurveEnd::End) - self.broken_end).abs() < 1e-9 {
                let err = GeometryError::ProjectionFailed("curve is unreadable".into());
                return Err(err.into());
            }
            LinearKernel::default().project(curve, point)
        }

        fn end_parameter(&self, curve: &AxisCurve, end: CurveEnd) -> f64 {
            curve.end_parameter(end)
        }
    }

    #[test]
    fn projection_failure_on_one_piece_falls_through_to_the_next() {
        // -X member: the first split at x=5 leaves the original on [0, 5]
        // and the new piece on [5, 10], which holds x=2.
        let (mut store, id) = store_with(p(10.0, 0.0, 0.0), p(0.0, 0.0, 0.0));
        let kernel = BrokenProjection { broken_end: 5.0 };
        let mut report = Report::new(false);
        let original = store.axis_curve(id).unwrap();
        let mut op = SplitMember::new(
            id,
            vec![p(2.0, 0.0, 0.0), p(5.0, 0.0, 0.0)],
            SplitOrder::DescendingX,
            PARAMETER_EPSILON,
        );
        op.analyze(&original, &kernel, &mut report);
        let result = op.execute(&mut store, &kernel, &mut report).unwrap();

        assert_eq!(result.splits_performed(), 2);
        let PointOutcome::Split { target, parameter, .. } = &result.outcomes[1] else {
            panic!("second point was not split");
        };
        assert_eq!(*target, result.segments[1]);
        assert_relative_eq!(*parameter, 0.6, epsilon = 1e-9);
        let failed = format!("projection on member {id:?} failed");
        assert!(report.lines().iter().any(|line| line.contains(&failed)));
    }

    /// Store that loses track of every member created by a split.
    struct ForgetfulStore {
        inner: MemberStore,
        known: MemberId,
    }

    impl MemberDocument for ForgetfulStore {
        type Id = MemberId;

        fn axis_curve(&self, id: MemberId) -> Result<AxisCurve> {
            if id != self.known {
                let err = DocumentError::CurveUnavailable(format!("{id:?}"));
                return Err(err.into());
            }
            self.inner.axis_curve(id)
        }

        fn split(&mut self, id: MemberId, parameter: f64) -> Result<MemberId> {
            self.inner.split(id, parameter)
        }

        fn begin_transaction(&mut self) -> Result<()> {
            self.inner.begin_transaction()
        }

        fn commit_transaction(&mut self) -> Result<()> {
            self.inner.commit_transaction()
        }
    }

    #[test]
    fn unreadable_piece_is_reported_and_skipped() {
        let (inner, id) = store_with(p(10.0, 0.0, 0.0), p(0.0, 0.0, 0.0));
        let mut doc = ForgetfulStore { inner, known: id };
        let kernel = LinearKernel::default();
        let mut report = Report::new(false);
        let original = doc.axis_curve(id).unwrap();
        // -X member: 9 splits first, and 8 then lies on the new piece
        // running from x=9 to x=0, whose axis can no longer be read.
        let mut op = SplitMember::new(
            id,
            vec![p(8.0, 0.0, 0.0), p(9.0, 0.0, 0.0)],
            SplitOrder::DescendingX,
            PARAMETER_EPSILON,
        );
        op.analyze(&original, &kernel, &mut report);
        let result = op.execute(&mut doc, &kernel, &mut report).unwrap();

        assert_eq!(result.splits_performed(), 1);
        assert!(matches!(result.outcomes[1], PointOutcome::Unassigned { .. }));
        let new_member = result.segments[1];
        let unreadable = format!("Could not read axis of member {new_member:?}");
        assert!(report.lines().iter().any(|line| line.contains(&unreadable)));
    }
}
