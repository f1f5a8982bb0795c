use std::fmt;
use std::hash::Hash;

use crate::config::AnalysisConfig;
use crate::document::{MemberDocument, TransactionScope};
use crate::error::Result;
use crate::geometry::AxisCurve;
use crate::kernel::GeometryAdapter;
use crate::math::Point3;
use crate::operations::modification::{DedupSplitPoints, MemberSplit, SplitMember};
use crate::operations::query::{IntersectionClassifier, PairwiseIntersect, PairwiseIntersections};
use crate::report::Report;

/// Detection output for one member.
#[derive(Debug, Clone)]
pub struct DetectedMember<Id> {
    pub member: Id,
    /// The member's axis, for preview.
    pub preview: AxisCurve,
    /// Accepted points lying strictly inside the member.
    pub points: Vec<Point3>,
}

/// Split output for one member that had valid split points.
#[derive(Debug, Clone)]
pub struct SplitEntry<Id> {
    pub member: Id,
    /// The member's axis before its own splits.
    pub preview: Option<AxisCurve>,
    /// Deduplicated split points.
    pub points: Vec<Point3>,
    /// Number of points before deduplication.
    pub raw_point_count: usize,
    /// Splitting result, absent if the member could not be split at all.
    pub result: Option<MemberSplit<Id>>,
}

/// Per-member output of a run.
#[derive(Debug, Clone)]
pub enum AnalysisOutput<Id> {
    Detection(Vec<DetectedMember<Id>>),
    Split(Vec<SplitEntry<Id>>),
}

/// Everything a run produced. The textual log goes to the caller's
/// [`Report`].
#[derive(Debug, Clone)]
pub struct AnalysisRun<Id> {
    pub output: AnalysisOutput<Id>,
    pub intersections: PairwiseIntersections,
}

impl<Id> AnalysisRun<Id> {
    /// Total number of splits the document accepted.
    #[must_use]
    pub fn splits_performed(&self) -> usize {
        match &self.output {
            AnalysisOutput::Detection(_) => 0,
            AnalysisOutput::Split(entries) => entries
                .iter()
                .filter_map(|e| e.result.as_ref())
                .map(MemberSplit::splits_performed)
                .sum(),
        }
    }
}

/// Finds mid-span crossings between members and optionally splits the
/// members at them.
///
/// Every step logs into the [`Report`] handed in by the caller. Per-pair
/// diagnostics are only kept when that report is verbose.
pub struct FramingAnalysis<'a, Id> {
    members: &'a [Id],
    config: AnalysisConfig,
}

impl<'a, Id> FramingAnalysis<'a, Id>
where
    Id: Copy + Eq + Hash + fmt::Debug,
{
    /// Creates a new analysis over `members`.
    #[must_use]
    pub fn new(members: &'a [Id], config: AnalysisConfig) -> Self {
        Self { members, config }
    }

    /// Runs detection, or detection and splitting when the configuration
    /// enables it.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, or the document
    /// fails to open or commit the split transaction.
    pub fn execute<D>(
        &self,
        doc: &mut D,
        kernel: &impl GeometryAdapter,
        report: &mut Report,
    ) -> Result<AnalysisRun<Id>>
    where
        D: MemberDocument<Id = Id>,
    {
        if self.config.split_enabled {
            self.detect_and_split(doc, kernel, report)
        } else {
            self.detect(doc, kernel, report)
        }
    }

    /// Reports the accepted crossings of every member without changing the
    /// document.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn detect<D>(
        &self,
        doc: &D,
        kernel: &impl GeometryAdapter,
        report: &mut Report,
    ) -> Result<AnalysisRun<Id>>
    where
        D: MemberDocument<Id = Id>,
    {
        self.config.validate()?;
        let (ids, curves) = self.collect_curves(doc, report);

        report.log(format!(
            "Checking for intersections between {} curves",
            curves.len()
        ));
        let intersections = self.find_intersections(&ids, &curves, kernel, report);
        report.log(format!(
            "Total intersections found: {}",
            intersections.total_points()
        ));
        report.log(format!(
            "Total unique pairs checked: {}",
            intersections.pairs_checked
        ));

        let detected = ids
            .iter()
            .zip(curves)
            .zip(&intersections.per_curve)
            .map(|((&member, preview), points)| {
                if !points.is_empty() {
                    report.log(format!(
                        "Member {member:?}: {} intersections found",
                        points.len()
                    ));
                }
                DetectedMember {
                    member,
                    preview,
                    points: points.clone(),
                }
            })
            .collect();

        Ok(AnalysisRun {
            output: AnalysisOutput::Detection(detected),
            intersections,
        })
    }

    /// Finds crossings and splits every member at its own deduplicated
    /// crossings, inside one document transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, or the document
    /// fails to open or commit the transaction. Failures of single splits
    /// are reported in the output instead.
    pub fn detect_and_split<D>(
        &self,
        doc: &mut D,
        kernel: &impl GeometryAdapter,
        report: &mut Report,
    ) -> Result<AnalysisRun<Id>>
    where
        D: MemberDocument<Id = Id>,
    {
        self.config.validate()?;
        let (ids, curves) = self.collect_curves(doc, report);

        let intersections = self.find_intersections(&ids, &curves, kernel, report);
        report.log(format!(
            "Total intersections found (for split): {}",
            intersections.total_points()
        ));
        report.log("Starting member splitting analysis...");
        report.log(format!("Total members to process: {}", ids.len()));
        let with_points = intersections
            .per_curve
            .iter()
            .filter(|pts| !pts.is_empty())
            .count();
        report.log(format!(
            "Total members with intersection points: {with_points}"
        ));

        let mut scheduled = Vec::new();
        for ((&member, curve), raw) in ids.iter().zip(&curves).zip(&intersections.per_curve) {
            if raw.is_empty() {
                continue;
            }
            report.log(format!(
                "Member {member:?}: Has {} intersection points for split",
                raw.len()
            ));
            let unique = DedupSplitPoints::new(raw, self.config.dedup_decimals).execute();
            let mut op = SplitMember::new(
                member,
                unique,
                self.config.split_order,
                self.config.parameter_epsilon,
            );
            let params = op.analyze(curve, kernel, report);
            if params.is_empty() {
                continue;
            }
            report.log(format!("Member {member:?}: {} split points", params.len()));
            scheduled.push((op, raw.len()));
        }
        report.log(format!(
            "Total members with split points: {}",
            scheduled.len()
        ));

        let mut scope = TransactionScope::begin(doc)?;
        let mut entries = Vec::with_capacity(scheduled.len());
        for (mut op, raw_point_count) in scheduled {
            let member = op.member();
            let preview = scope.axis_curve(member).ok();
            report.log(format!(
                "Output: Member {member:?} -> curve, {} unique intersection points (was {raw_point_count})",
                op.points().len()
            ));
            let points = op.points().to_vec();
            let result = match op.execute(&mut *scope, kernel, report) {
                Ok(result) => Some(result),
                Err(err) => {
                    report.warn(format!("  ERROR processing member {member:?}: {err}"));
                    None
                }
            };
            entries.push(SplitEntry {
                member,
                preview,
                points,
                raw_point_count,
                result,
            });
        }

        let splits: usize = entries
            .iter()
            .filter_map(|e| e.result.as_ref())
            .map(MemberSplit::splits_performed)
            .sum();
        report.log(format!("Total output entries: {}", entries.len()));
        report.log(format!("Total splits performed: {splits}"));

        scope.finish()?;
        Ok(AnalysisRun {
            output: AnalysisOutput::Split(entries),
            intersections,
        })
    }

    /// Reads each member's axis. Members without one are reported and left out.
    fn collect_curves<D>(&self, doc: &D, report: &mut Report) -> (Vec<Id>, Vec<AxisCurve>)
    where
        D: MemberDocument<Id = Id>,
    {
        report.log(format!("Tolerance: {}", self.config.tolerance));
        report.log(format!("Z tolerance: {}", self.config.z_tolerance));
        report.log(format!("Total members found: {}", self.members.len()));
        report.log(format!("Split enabled: {}", self.config.split_enabled));

        let mut ids = Vec::with_capacity(self.members.len());
        let mut curves = Vec::with_capacity(self.members.len());
        for &member in self.members {
            match doc.axis_curve(member) {
                Ok(curve) => {
                    ids.push(member);
                    curves.push(curve);
                }
                Err(err) => report.warn(format!("Member {member:?} skipped: {err}")),
            }
        }
        report.log(format!("Total curves extracted: {}", curves.len()));
        (ids, curves)
    }

    fn find_intersections(
        &self,
        ids: &[Id],
        curves: &[AxisCurve],
        kernel: &impl GeometryAdapter,
        report: &mut Report,
    ) -> PairwiseIntersections {
        let classifier =
            IntersectionClassifier::new(self.config.tolerance, self.config.z_tolerance);
        PairwiseIntersect::new(curves, ids, classifier, self.config.parameter_epsilon)
            .execute(kernel, report)
    }
}
