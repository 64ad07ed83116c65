use std::{thread, time::Duration};

use tracing::info;

use crate::{
    annotation::{build_update, Annotator},
    catalog::TargetIds,
    types::{RemoteVideo, RunCounters, VideoOutcome},
    youtube::{error::ApiResult, VideoPlatform},
};

/// What happens to annotations on videos that are no longer in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StalePolicy {
    /// Only ever add annotations.
    #[default]
    Keep,
    Remove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileOptions {
    pub dry_run: bool,
    pub stale: StalePolicy,
    /// Pause after every write; YouTube answers bursts with 403s.
    pub request_delay: Duration,
}

pub struct Reconciler<'a, A: Annotator> {
    annotator: &'a A,
    targets: &'a TargetIds,
    options: ReconcileOptions,
    sleep: Box<dyn Fn(Duration) + 'a>,
}

impl<'a, A: Annotator> Reconciler<'a, A> {
    pub fn new(annotator: &'a A, targets: &'a TargetIds, options: ReconcileOptions) -> Self {
        Reconciler {
            annotator,
            targets,
            options,
            sleep: Box::new(thread::sleep),
        }
    }

    #[cfg(test)]
    fn with_sleep(mut self, sleep: impl Fn(Duration) + 'a) -> Self {
        self.sleep = Box::new(sleep);
        self
    }

    /// Walks every upload page by page. Counters are updated as videos are
    /// handled, so they stay meaningful when an error stops the pass.
    pub fn run<P: VideoPlatform>(&self, platform: &P, counters: &mut RunCounters) -> ApiResult<()> {
        let mut cursor: Option<String> = None;

        loop {
            let page = platform.uploads_page(cursor.as_deref())?;

            for video in &page.videos {
                let outcome = self.reconcile_video(platform, video)?;
                counters.record(outcome);
            }

            match page.next {
                Some(next) => cursor = Some(next),
                None => return Ok(()),
            }
        }
    }

    pub fn reconcile_video<P: VideoPlatform>(
        &self,
        platform: &P,
        video: &RemoteVideo,
    ) -> ApiResult<VideoOutcome> {
        let description = video.description.as_deref();

        if video.is_draft {
            // YouTube rejects updates to drafts
            info!(".. skipping {} (unpublished)", video.id);
            return Ok(VideoOutcome::Unpublished);
        }

        if let Some(catalog_id) = self.targets.catalog_id(&video.id) {
            let annotated = self.annotator.annotate(description, catalog_id);

            if annotated == description.unwrap_or("") {
                info!(".. skipping {} (already annotated)", video.id);
                return Ok(VideoOutcome::AlreadyAnnotated);
            }

            info!(".. updating description for {}", video.id);
            self.write(platform, video, &annotated)?;
            return Ok(VideoOutcome::Updated);
        }

        if self.options.stale == StalePolicy::Remove && self.annotator.is_annotated(description) {
            info!(".. removing annotation from {} (not in catalog)", video.id);
            let stripped = self.annotator.unannotate(description);
            self.write(platform, video, &stripped)?;
            return Ok(VideoOutcome::AnnotationRemoved);
        }

        info!(".. skipping {} (not in catalog)", video.id);
        Ok(VideoOutcome::NotInCatalog)
    }

    fn write<P: VideoPlatform>(
        &self,
        platform: &P,
        video: &RemoteVideo,
        description: &str,
    ) -> ApiResult<()> {
        if self.options.dry_run {
            return Ok(());
        }

        let update = build_update(&video.id, description, video.keywords.as_deref());
        platform.update(video, &update)?;

        if !self.options.request_delay.is_zero() {
            (self.sleep)(self.options.request_delay);
        }

        Ok(())
    }
}
