// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Batch connected-component extraction
//!
//! Each input cloud goes through
//! `NeedIndex -> Labeling -> SizeCheck -> Ranking -> Materializing -> Done`,
//! or leaves early as `Skipped`. A cloud with more qualifying components than
//! allowed stops the whole batch.

use super::labeler::{ComponentLabelingEngine, OctreeLabeler, CC_LABEL_FIELD_NAME};
use super::materializer::{
    create_components_clouds, CloudFactory, ComponentSource, DefaultCloudFactory,
};
use crate::config::ExtractionParams;
use crate::error::Result;
use crate::geometry::{Entity, PointCloud, ReferenceCloudContainer, ScalarField};
use crate::spatial::{Octree, OctreeProvider, SpatialIndexProvider};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Processing stage of one input cloud
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CloudStage {
    NeedIndex,
    Labeling,
    SizeCheck,
    Ranking,
    Materializing,
    Done,
    Skipped,
}

/// What happened to one input cloud
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CloudOutcome {
    Done {
        cloud: String,
        components: usize,
    },
    Skipped {
        cloud: String,
        stage: CloudStage,
        reason: String,
    },
    Aborted {
        cloud: String,
        found: usize,
        max: usize,
    },
}

/// Circuit breaker record: a cloud had too many qualifying components
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TooManyComponents {
    pub cloud: String,
    pub found: usize,
    pub max: usize,
}

/// Result of a batch extraction
#[derive(Debug, Default)]
pub struct ExtractionResult {
    /// Clouds that went through labeling to the end
    pub processed_clouds: usize,
    /// New component clouds, ranked per source, sources in input order
    pub components: Vec<PointCloud>,
    /// One entry per input point cloud that was looked at
    pub outcomes: Vec<CloudOutcome>,
    /// Set when the batch stopped on too many components
    pub aborted: Option<TooManyComponents>,
}

impl ExtractionResult {
    /// `(processed cloud count, components)`
    pub fn into_parts(self) -> (usize, Vec<PointCloud>) {
        (self.processed_clouds, self.components)
    }

    pub fn is_complete(&self) -> bool {
        self.aborted.is_none()
    }

    /// Components grouped by the cloud they were extracted from
    pub fn components_by_source(&self) -> Vec<(&str, &[PointCloud])> {
        let mut grouped = Vec::new();
        let mut start = 0;
        for outcome in &self.outcomes {
            if let CloudOutcome::Done { cloud, components } = outcome {
                let end = (start + components).min(self.components.len());
                grouped.push((cloud.as_str(), &self.components[start..end]));
                start = end;
            }
        }
        grouped
    }
}

enum CloudStep {
    Done(Vec<PointCloud>),
    Skipped(CloudStage, String),
    Abort(TooManyComponents),
}

/// Scratch label field attached to a cloud for the guard's lifetime.
///
/// Dropping the guard deletes the field and restores the previous current
/// field, on every exit path.
struct ScratchField<'a> {
    cloud: &'a mut PointCloud,
    previous_current: Option<String>,
}

impl<'a> ScratchField<'a> {
    /// Attach a freshly allocated label field, replacing any stale one
    fn attach(cloud: &'a mut PointCloud, field: ScalarField) -> Result<Self> {
        let previous_current = cloud.current_scalar_field().map(|sf| sf.name().to_string());
        let index = cloud.insert_scalar_field(field)?;
        cloud.set_current_scalar_field(Some(index))?;
        Ok(Self {
            cloud,
            previous_current,
        })
    }

    fn cloud(&mut self) -> &mut PointCloud {
        self.cloud
    }
}

impl Drop for ScratchField<'_> {
    fn drop(&mut self) {
        if let Some(index) = self.cloud.scalar_field_index_by_name(CC_LABEL_FIELD_NAME) {
            if let Err(e) = self.cloud.delete_scalar_field(index) {
                log::warn!("Failed to remove '{}' field: {}", CC_LABEL_FIELD_NAME, e);
            }
        }
        let restored = self
            .previous_current
            .as_deref()
            .and_then(|name| self.cloud.scalar_field_index_by_name(name));
        if restored.is_some() {
            if let Err(e) = self.cloud.set_current_scalar_field(restored) {
                log::warn!("Failed to restore the current scalar field: {}", e);
            }
        }
    }
}

/// Connected-component extraction over pluggable engine capabilities
pub struct ComponentExtractor {
    index_provider: Box<dyn SpatialIndexProvider>,
    labeler: Box<dyn ComponentLabelingEngine>,
    factory: Box<dyn CloudFactory>,
}

impl Default for ComponentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentExtractor {
    /// Extractor using the in-crate octree, labeler and cloud factory
    pub fn new() -> Self {
        Self {
            index_provider: Box::new(OctreeProvider),
            labeler: Box::new(OctreeLabeler),
            factory: Box::new(DefaultCloudFactory),
        }
    }

    pub fn with_index_provider(mut self, provider: impl SpatialIndexProvider + 'static) -> Self {
        self.index_provider = Box::new(provider);
        self
    }

    pub fn with_labeler(mut self, labeler: impl ComponentLabelingEngine + 'static) -> Self {
        self.labeler = Box::new(labeler);
        self
    }

    pub fn with_factory(mut self, factory: impl CloudFactory + 'static) -> Self {
        self.factory = Box::new(factory);
        self
    }

    /// Extract connected components from every point cloud of `entities`.
    ///
    /// Non-cloud entities are ignored. Clouds that cannot be indexed or
    /// labelled are skipped. If a cloud has more than
    /// `max_number_components` components of at least `min_component_size`
    /// points, the call returns what earlier clouds produced and processes
    /// nothing further.
    pub fn extract(&self, entities: &mut [Entity], params: &ExtractionParams) -> ExtractionResult {
        let mut result = ExtractionResult::default();

        let mut rng = match params.color_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        for cloud in entities.iter_mut().filter_map(Entity::as_point_cloud_mut) {
            let name = cloud.name().to_string();
            match self.process_cloud(cloud, params, &mut rng) {
                CloudStep::Done(components) => {
                    result.outcomes.push(CloudOutcome::Done {
                        cloud: name,
                        components: components.len(),
                    });
                    result.components.extend(components);
                    result.processed_clouds += 1;
                }
                CloudStep::Skipped(stage, reason) => {
                    log::warn!("Skipping cloud '{}' ({:?}): {}", name, stage, reason);
                    result.outcomes.push(CloudOutcome::Skipped {
                        cloud: name,
                        stage,
                        reason,
                    });
                }
                CloudStep::Abort(too_many) => {
                    log::warn!(
                        "Too many components: {} for a maximum of {}",
                        too_many.found,
                        too_many.max
                    );
                    log::warn!("Extraction incomplete, modify some parameters and retry");
                    result.outcomes.push(CloudOutcome::Aborted {
                        cloud: too_many.cloud.clone(),
                        found: too_many.found,
                        max: too_many.max,
                    });
                    result.aborted = Some(too_many);
                    break;
                }
            }
        }

        result
    }

    fn process_cloud(
        &self,
        cloud: &mut PointCloud,
        params: &ExtractionParams,
        rng: &mut StdRng,
    ) -> CloudStep {
        log::debug!("'{}': {:?}", cloud.name(), CloudStage::NeedIndex);
        let octree = match self.index_provider.get_or_build(cloud) {
            Ok(octree) => octree,
            Err(e) => {
                return CloudStep::Skipped(
                    CloudStage::NeedIndex,
                    format!("couldn't compute octree: {}", e),
                )
            }
        };

        log::debug!("'{}': {:?}", cloud.name(), CloudStage::Labeling);
        let field = ScalarField::try_new(CC_LABEL_FIELD_NAME, cloud.size());
        let components = match self.label_components(cloud, &octree, field, params) {
            Ok(components) => components,
            Err(skipped) => return skipped,
        };

        log::debug!("'{}': {:?}", cloud.name(), CloudStage::SizeCheck);
        let qualifying = components
            .iter()
            .filter(|c| c.size() >= params.min_component_size)
            .count();
        if qualifying > params.max_number_components {
            return CloudStep::Abort(TooManyComponents {
                cloud: cloud.name().to_string(),
                found: qualifying,
                max: params.max_number_components,
            });
        }

        log::debug!(
            "'{}': {:?} -> {:?}",
            cloud.name(),
            CloudStage::Ranking,
            CloudStage::Materializing
        );
        let created = create_components_clouds(
            ComponentSource::Committed(cloud),
            components,
            &params.materialize_options(),
            self.factory.as_ref(),
            rng,
        );

        log::debug!("'{}': {:?}", cloud.name(), CloudStage::Done);
        CloudStep::Done(created)
    }

    /// Label the cloud through a scratch field and group its points.
    ///
    /// The scratch field is gone when this returns, whatever the outcome.
    fn label_components(
        &self,
        cloud: &mut PointCloud,
        octree: &Octree,
        field: Result<ScalarField>,
        params: &ExtractionParams,
    ) -> std::result::Result<ReferenceCloudContainer, CloudStep> {
        let attached = field.and_then(|field| ScratchField::attach(cloud, field));
        let mut scratch = match attached {
            Ok(scratch) => scratch,
            Err(e) => {
                return Err(CloudStep::Skipped(
                    CloudStage::Labeling,
                    format!("couldn't allocate a scalar field for labels: {}", e),
                ))
            }
        };

        let labelled = self.labeler.label_connected_components(
            scratch.cloud(),
            octree,
            params.octree_level,
            params.six_connexity,
        );
        labelled
            .and_then(|count| {
                log::debug!("{} component(s) labelled", count);
                self.labeler.extract_connected_components(scratch.cloud())
            })
            .map_err(|e| {
                CloudStep::Skipped(
                    CloudStage::Labeling,
                    format!("something went wrong while extracting components: {}", e),
                )
            })
    }
}
