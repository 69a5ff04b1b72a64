//! # Recommendation Orchestrator
//!
//! This module coordinates the whole recommendation pipeline:
//! 1. Validate the image and ask the vision model for recipes
//! 2. Parse the model's text into a `RecommendationResult` (fail-soft)
//! 3. Fan out one video lookup per recipe, all in flight at once
//! 4. Per recipe: search ids, fetch details, rank the top videos
//! 5. Merge the lookups back in recipe order
//!
//! Only a rejected image or an unreachable vision model fail the request.
//! Everything downstream of the model degrades instead: a broken parse gives
//! an explanatory message with no recipes, a broken video lookup gives that
//! one recipe an empty video list.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tokio::task::JoinSet;
use tracing::{info, instrument, warn};

use pipeline::VideoRanker;
use recipe_model::{
    parse_recommendation, EnrichedRecipe, EnrichedRecommendationResult, FailSoft,
    RecipeSuggestion, RecommendError, RecommendationResult, VideoSummary,
};
use video_sources::{VideoSearchClient, VideoSource, YouTubeSource};
use vision_client::{GeminiVisionModel, VisionModel, VisionRecommendationClient};

use crate::config::PipelineConfig;

/// Appended to a recipe name to form its video search query
pub const VIDEO_QUERY_SUFFIX: &str = " 레시피";

/// Build the video search query for a recipe name
pub fn build_video_query(recipe_name: &str) -> String {
    format!("{}{}", recipe_name, VIDEO_QUERY_SUFFIX)
}

/// Per-recipe video lookup. Cloned into each fan-out task.
#[derive(Clone)]
struct VideoEnricher {
    videos: VideoSearchClient,
    ranker: VideoRanker,
    search_limit: usize,
}

impl VideoEnricher {
    async fn find_videos(&self, recipe_name: &str, count: usize) -> FailSoft<Vec<VideoSummary>> {
        let query = build_video_query(recipe_name);

        let ids = self.videos.search_ids(&query, self.search_limit).await;
        if ids.is_degraded() {
            return ids.map(|_| Vec::new());
        }
        let ids = ids.into_inner();
        if ids.is_empty() {
            info!("No videos found for '{}'", recipe_name);
            return FailSoft::Ok(Vec::new());
        }

        self.videos
            .fetch_details(&ids)
            .await
            .map(|details| self.ranker.rank(details, count))
    }
}

/// Main orchestrator that coordinates the recommendation pipeline
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    vision: VisionRecommendationClient,
    enricher: VideoEnricher,
}

impl RecommendationOrchestrator {
    /// Create an orchestrator over the given model and video platform
    pub fn new(
        vision_model: Arc<dyn VisionModel>,
        video_source: Arc<dyn VideoSource>,
        config: &PipelineConfig,
    ) -> Self {
        let vision = VisionRecommendationClient::new(vision_model).with_timeout(config.vision_timeout);
        let videos = VideoSearchClient::new(video_source).with_timeout(config.video_timeout);

        Self {
            vision,
            enricher: VideoEnricher {
                videos,
                ranker: VideoRanker::new(),
                search_limit: config.search_limit,
            },
        }
    }

    /// Wire up Gemini and YouTube from environment variables
    pub fn from_env(config: &PipelineConfig) -> Result<Self> {
        let model = GeminiVisionModel::from_env().context("Failed to configure vision model")?;
        let source = YouTubeSource::from_env();
        if !source.has_api_key() {
            warn!("YOUTUBE_API_KEY is not set; recipes will have no videos");
        }

        Ok(Self::new(Arc::new(model), Arc::new(source), config))
    }

    /// Recommend recipes for a food photo, without videos.
    ///
    /// # Errors
    /// `InvalidInput` for a non-image or empty upload, `UpstreamUnavailable`
    /// when the vision model cannot be reached. A reply that cannot be parsed
    /// is not an error: it yields a message and no recipes.
    #[instrument(skip(self, image), fields(bytes = image.len()))]
    pub async fn recommend(
        &self,
        image: Vec<u8>,
        mime_type: &str,
        modifier: Option<&str>,
    ) -> Result<RecommendationResult, RecommendError> {
        let raw = self.vision.recommend_raw(image, mime_type, modifier).await?;

        let parsed = parse_recommendation(&raw);
        if let Some(reason) = parsed.reason() {
            warn!("Returning fallback recommendation: {}", reason);
        }
        let result = parsed.into_inner();

        info!("Model suggested {} recipes", result.recipes.len());
        Ok(result)
    }

    /// Recommend recipes for a food photo, each with up to `video_count` videos.
    ///
    /// `video_count` is clamped to [1, 3]. Video lookups run concurrently and
    /// never fail the request; the output keeps the model's recipe order.
    #[instrument(skip(self, image), fields(bytes = image.len()))]
    pub async fn recommend_with_videos(
        &self,
        image: Vec<u8>,
        mime_type: &str,
        modifier: Option<&str>,
        video_count: usize,
    ) -> Result<EnrichedRecommendationResult, RecommendError> {
        let start_time = Instant::now();

        let RecommendationResult { recipes, message } =
            self.recommend(image, mime_type, modifier).await?;

        let recipes = self.enrich_all(recipes, video_count).await;
        let with_videos = recipes.iter().filter(|r| !r.videos.is_empty()).count();

        info!(
            "Enriched {} recipes ({} with videos) in {:.2?}",
            recipes.len(),
            with_videos,
            start_time.elapsed()
        );

        Ok(EnrichedRecommendationResult { recipes, message })
    }

    /// Top videos for a single recipe name. Empty when the platform fails.
    #[instrument(skip(self))]
    pub async fn videos_for_recipe(&self, recipe_name: &str, count: usize) -> Vec<VideoSummary> {
        let found = self.enricher.find_videos(recipe_name, count).await;
        if let Some(reason) = found.reason() {
            warn!("No videos for '{}': {}", recipe_name, reason);
        }
        found.into_inner()
    }

    /// Look up videos for every recipe at once and merge them in input order.
    ///
    /// The tasks live in a `JoinSet`; dropping this future aborts them.
    async fn enrich_all(
        &self,
        recipes: Vec<RecipeSuggestion>,
        video_count: usize,
    ) -> Vec<EnrichedRecipe> {
        let mut tasks = JoinSet::new();
        for (index, recipe) in recipes.iter().enumerate() {
            let enricher = self.enricher.clone();
            let name = recipe.name.clone();
            tasks.spawn(async move { (index, enricher.find_videos(&name, video_count).await) });
        }

        let mut found: Vec<Vec<VideoSummary>> = vec![Vec::new(); recipes.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => {
                    if let Some(reason) = outcome.reason() {
                        warn!("Video lookup for '{}' degraded: {}", recipes[index].name, reason);
                    }
                    found[index] = outcome.into_inner();
                }
                // The slot for a panicked task stays empty
                Err(e) => warn!("Video lookup task failed: {}", e),
            }
        }

        recipes
            .into_iter()
            .zip(found)
            .map(|(recipe, videos)| EnrichedRecipe { recipe, videos })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use recipe_model::NO_RECIPES_MESSAGE;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use video_sources::{VideoMetadata, VideoServiceError};
    use vision_client::{VisionClientError, VisionRequest};

    // ============================================================================
    // Test Fixtures
    // ============================================================================

    fn recipe(name: &str) -> RecipeSuggestion {
        RecipeSuggestion {
            name: name.to_string(),
            description: format!("{} 설명", name),
            ingredients: vec!["두부".to_string(), "간장".to_string()],
            instructions: vec!["굽는다".to_string(), "졸인다".to_string()],
            estimated_time_minutes: 20,
            difficulty: "쉬움".to_string(),
            tips: "약불에서 졸이세요".to_string(),
        }
    }

    fn model_reply(names: &[&str]) -> String {
        let result = RecommendationResult {
            recipes: names.iter().map(|n| recipe(n)).collect(),
            message: "맛있게 드세요".to_string(),
        };
        let json = serde_json::to_string(&result).unwrap();
        format!("```json\n{}\n```", json)
    }

    /// Vision model with a canned reply that records the prompt it was sent
    struct MockVisionModel {
        reply: String,
        last_prompt: Mutex<Option<String>>,
    }

    impl MockVisionModel {
        fn new(reply: impl Into<String>) -> Self {
            Self {
                reply: reply.into(),
                last_prompt: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl VisionModel for MockVisionModel {
        async fn generate(&self, request: VisionRequest<'_>) -> Result<String, VisionClientError> {
            *self.last_prompt.lock().unwrap() = Some(request.prompt.to_string());
            Ok(self.reply.clone())
        }

        fn model_name(&self) -> &str {
            "mock-vision"
        }
    }

    struct DownVisionModel;

    #[async_trait]
    impl VisionModel for DownVisionModel {
        async fn generate(&self, _request: VisionRequest<'_>) -> Result<String, VisionClientError> {
            Err(VisionClientError::RequestFailed("connection refused".to_string()))
        }

        fn model_name(&self) -> &str {
            "down"
        }
    }

    /// Video platform where each query gets its own id prefix and the given
    /// view counts. Queries for `failing` recipes error out, and queries for
    /// `panicking` recipes panic.
    struct MockVideoSource {
        view_counts: Vec<u64>,
        failing: Vec<String>,
        panicking: Vec<String>,
        search_delay: fn(&str) -> Duration,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl MockVideoSource {
        fn new(view_counts: &[u64]) -> Self {
            Self {
                view_counts: view_counts.to_vec(),
                failing: Vec::new(),
                panicking: Vec::new(),
                search_delay: |_| Duration::ZERO,
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }

        fn failing_for(mut self, recipe_name: &str) -> Self {
            self.failing.push(build_video_query(recipe_name));
            self
        }

        fn panicking_for(mut self, recipe_name: &str) -> Self {
            self.panicking.push(build_video_query(recipe_name));
            self
        }

        fn with_delay(mut self, delay: fn(&str) -> Duration) -> Self {
            self.search_delay = delay;
            self
        }
    }

    #[async_trait]
    impl VideoSource for MockVideoSource {
        async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>, VideoServiceError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep((self.search_delay)(query)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.panicking.iter().any(|q| q == query) {
                panic!("search exploded for {}", query);
            }
            if self.failing.iter().any(|q| q == query) {
                return Err(VideoServiceError::ApiError {
                    status: 403,
                    message: "quotaExceeded".to_string(),
                });
            }

            let prefix = query.trim_end_matches(VIDEO_QUERY_SUFFIX);
            Ok((0..self.view_counts.len().min(limit))
                .map(|i| format!("{}-{}", prefix, i))
                .collect())
        }

        async fn fetch_details(&self, ids: &[String]) -> Result<Vec<VideoMetadata>, VideoServiceError> {
            Ok(ids
                .iter()
                .map(|id| {
                    let index: usize = id.rsplit('-').next().unwrap().parse().unwrap();
                    VideoMetadata::new(id.clone(), self.view_counts[index])
                        .with_title(format!("{} 영상", id))
                })
                .collect())
        }

        fn name(&self) -> &str {
            "mock-videos"
        }
    }

    fn build_orchestrator(
        model: Arc<dyn VisionModel>,
        source: Arc<dyn VideoSource>,
    ) -> RecommendationOrchestrator {
        RecommendationOrchestrator::new(model, source, &PipelineConfig::default())
    }

    fn view_counts(videos: &[VideoSummary]) -> Vec<u64> {
        videos.iter().map(|v| v.view_count).collect()
    }

    // ============================================================================
    // Tests
    // ============================================================================

    #[test]
    fn test_build_video_query() {
        assert_eq!(build_video_query("김치찌개"), "김치찌개 레시피");
    }

    #[tokio::test]
    async fn test_recommend_with_videos_end_to_end() {
        let model = Arc::new(MockVisionModel::new(model_reply(&["두부조림", "계란말이"])));
        let source = Arc::new(MockVideoSource::new(&[100, 500, 50, 900, 10]));
        let orchestrator = build_orchestrator(model.clone(), source);

        let result = orchestrator
            .recommend_with_videos(vec![0xFF, 0xD8], "image/jpeg", Some("make it spicy"), 3)
            .await
            .unwrap();

        let prompt = model.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.ends_with("\n\n추가 요청사항: make it spicy"));

        assert_eq!(result.message, "맛있게 드세요");
        assert_eq!(result.recipes.len(), 2);
        assert_eq!(result.recipes[0].recipe.name, "두부조림");
        assert_eq!(result.recipes[1].recipe.name, "계란말이");
        for enriched in &result.recipes {
            assert_eq!(view_counts(&enriched.videos), vec![900, 500, 100]);
            assert!(enriched.videos[0].id.starts_with(&enriched.recipe.name));
        }
    }

    #[tokio::test]
    async fn test_failed_lookup_only_empties_its_recipe() {
        let model = Arc::new(MockVisionModel::new(model_reply(&["두부조림", "계란말이"])));
        let source = Arc::new(MockVideoSource::new(&[1, 2, 3]).failing_for("계란말이"));
        let orchestrator = build_orchestrator(model, source);

        let result = orchestrator
            .recommend_with_videos(vec![1, 2, 3], "image/png", None, 3)
            .await
            .unwrap();

        assert_eq!(result.recipes.len(), 2);
        assert_eq!(view_counts(&result.recipes[0].videos), vec![3, 2, 1]);
        assert!(
            result.recipes[1].videos.is_empty(),
            "Failed search should leave only that recipe without videos"
        );
    }

    #[tokio::test]
    async fn test_panicked_lookup_yields_empty_videos() {
        let model = Arc::new(MockVisionModel::new(model_reply(&["두부조림", "계란말이"])));
        let source = Arc::new(MockVideoSource::new(&[1, 2]).panicking_for("두부조림"));
        let orchestrator = build_orchestrator(model, source);

        let result = orchestrator
            .recommend_with_videos(vec![1], "image/png", None, 3)
            .await
            .unwrap();

        assert!(result.recipes[0].videos.is_empty());
        assert_eq!(view_counts(&result.recipes[1].videos), vec![2, 1]);
    }

    #[tokio::test]
    async fn test_recipe_order_survives_completion_order() {
        let names = ["느린요리", "보통요리", "빠른요리"];
        let model = Arc::new(MockVisionModel::new(model_reply(&names)));
        let source = Arc::new(MockVideoSource::new(&[7]).with_delay(|query| {
            if query.starts_with("느린") {
                Duration::from_millis(60)
            } else if query.starts_with("보통") {
                Duration::from_millis(30)
            } else {
                Duration::ZERO
            }
        }));
        let orchestrator = build_orchestrator(model, source);

        let result = orchestrator
            .recommend_with_videos(vec![1], "image/webp", None, 1)
            .await
            .unwrap();

        let order: Vec<&str> = result.recipes.iter().map(|r| r.recipe.name.as_str()).collect();
        assert_eq!(order, names.to_vec());
        for enriched in &result.recipes {
            assert_eq!(enriched.videos[0].id, format!("{}-0", enriched.recipe.name));
        }
    }

    #[tokio::test]
    async fn test_lookups_run_concurrently() {
        let model = Arc::new(MockVisionModel::new(model_reply(&["가", "나", "다"])));
        let source = Arc::new(
            MockVideoSource::new(&[1]).with_delay(|_| Duration::from_millis(30)),
        );
        let orchestrator = build_orchestrator(model, source.clone());

        orchestrator
            .recommend_with_videos(vec![1], "image/png", None, 1)
            .await
            .unwrap();

        assert!(
            source.max_in_flight.load(Ordering::SeqCst) >= 2,
            "Per-recipe searches should overlap"
        );
    }

    #[tokio::test]
    async fn test_dropping_request_aborts_lookups() {
        struct SlowSource {
            finished: Arc<AtomicBool>,
        }

        #[async_trait]
        impl VideoSource for SlowSource {
            async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<String>, VideoServiceError> {
                tokio::time::sleep(Duration::from_millis(200)).await;
                self.finished.store(true, Ordering::SeqCst);
                Ok(Vec::new())
            }

            async fn fetch_details(&self, _ids: &[String]) -> Result<Vec<VideoMetadata>, VideoServiceError> {
                Ok(Vec::new())
            }

            fn name(&self) -> &str {
                "slow"
            }
        }

        let finished = Arc::new(AtomicBool::new(false));
        let model = Arc::new(MockVisionModel::new(model_reply(&["두부조림"])));
        let source = Arc::new(SlowSource {
            finished: finished.clone(),
        });
        let orchestrator = build_orchestrator(model, source);

        let request = orchestrator.recommend_with_videos(vec![1], "image/png", None, 3);
        let outcome = tokio::time::timeout(Duration::from_millis(50), request).await;
        assert!(outcome.is_err(), "Request should still be waiting on videos");

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(
            !finished.load(Ordering::SeqCst),
            "Abandoned lookups should be aborted"
        );
    }

    #[tokio::test]
    async fn test_invalid_mime_type_fails_request() {
        let model = Arc::new(MockVisionModel::new(model_reply(&["두부조림"])));
        let orchestrator = build_orchestrator(model.clone(), Arc::new(MockVideoSource::new(&[1])));

        let err = orchestrator
            .recommend_with_videos(b"%PDF".to_vec(), "application/pdf", None, 3)
            .await
            .unwrap_err();

        assert!(matches!(err, RecommendError::InvalidInput(_)));
        assert!(err.is_client_error());
        assert!(
            model.last_prompt.lock().unwrap().is_none(),
            "Model must not be called for a rejected upload"
        );
    }

    #[tokio::test]
    async fn test_unreachable_model_fails_request() {
        let orchestrator =
            build_orchestrator(Arc::new(DownVisionModel), Arc::new(MockVideoSource::new(&[1])));

        let err = orchestrator
            .recommend(vec![1], "image/png", None)
            .await
            .unwrap_err();

        assert!(matches!(err, RecommendError::UpstreamUnavailable(_)));
        assert!(!err.is_client_error());
    }

    #[tokio::test]
    async fn test_unparseable_reply_degrades_to_message() {
        let model = Arc::new(MockVisionModel::new("사진이 흐려서 잘 모르겠어요"));
        let orchestrator = build_orchestrator(model, Arc::new(MockVideoSource::new(&[1])));

        let result = orchestrator
            .recommend_with_videos(vec![1], "image/png", None, 3)
            .await
            .unwrap();

        assert!(result.recipes.is_empty());
        assert!(result.message.contains("사진이 흐려서 잘 모르겠어요"));
    }

    #[tokio::test]
    async fn test_zero_recipes_gets_default_message() {
        let model = Arc::new(MockVisionModel::new(r#"{"recipes": [], "message": ""}"#));
        let orchestrator = build_orchestrator(model, Arc::new(MockVideoSource::new(&[1])));

        let result = orchestrator.recommend(vec![1], "image/png", None).await.unwrap();

        assert!(result.recipes.is_empty());
        assert_eq!(result.message, NO_RECIPES_MESSAGE);
    }

    #[tokio::test]
    async fn test_videos_for_recipe() {
        let orchestrator = build_orchestrator(
            Arc::new(MockVisionModel::new("")),
            Arc::new(MockVideoSource::new(&[5, 50, 500, 5000])),
        );

        let videos = orchestrator.videos_for_recipe("된장찌개", 2).await;
        assert_eq!(view_counts(&videos), vec![5000, 500]);

        let clamped = orchestrator.videos_for_recipe("된장찌개", 10).await;
        assert_eq!(clamped.len(), 3);
    }

    #[tokio::test]
    async fn test_videos_for_recipe_without_results() {
        let orchestrator = build_orchestrator(
            Arc::new(MockVisionModel::new("")),
            Arc::new(MockVideoSource::new(&[])),
        );

        assert!(orchestrator.videos_for_recipe("없는요리", 3).await.is_empty());
    }
}
