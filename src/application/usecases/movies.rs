use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::{
    application::usecases::{
        access_gate::{self, AccessDecision, Viewer},
        entitlements::EntitlementUseCase,
    },
    domain::{
        clock::Clock,
        entities::reviews::InsertReviewEntity,
        repositories::{
            movies::MovieRepository, plans::PlanRepository, reviews::ReviewRepository,
            subscriptions::SubscriptionRepository,
        },
        value_objects::{
            movies::{BrowseQueryModel, EditMovieModel, InsertMovieModel, MovieModel},
            reviews::{InsertReviewModel, ReviewModel},
        },
    },
};

const FEATURED_LIMIT: i64 = 5;
const FEATURED_MINIMUM: usize = 3;

#[derive(Debug, Error)]
pub enum MovieError {
    #[error("movie not found")]
    NotFound,
    #[error("please login to access this content")]
    LoginRequired,
    #[error("this content requires a subscription")]
    SubscriptionRequired,
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl MovieError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            MovieError::NotFound => StatusCode::NOT_FOUND,
            MovieError::LoginRequired => StatusCode::UNAUTHORIZED,
            MovieError::SubscriptionRequired => StatusCode::FORBIDDEN,
            MovieError::Validation(_) => StatusCode::BAD_REQUEST,
            MovieError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Where a browser client should go next, mirroring the redirects the
    /// server-rendered original performed.
    pub fn redirect_hint(&self) -> Option<&'static str> {
        match self {
            MovieError::LoginRequired => Some("/api/v1/auth/login"),
            MovieError::SubscriptionRequired => Some("/api/v1/subscriptions/plans"),
            _ => None,
        }
    }
}

pub type MovieResult<T> = std::result::Result<T, MovieError>;

#[derive(Debug, Clone, Serialize)]
pub struct MovieDetailModel {
    pub movie: MovieModel,
    pub reviews: Vec<ReviewModel>,
}

pub struct MovieUseCase<M, R, P, S, C>
where
    M: MovieRepository + Send + Sync + 'static,
    R: ReviewRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    C: Clock + 'static,
{
    movie_repo: Arc<M>,
    review_repo: Arc<R>,
    entitlements: Arc<EntitlementUseCase<P, S, C>>,
}

impl<M, R, P, S, C> MovieUseCase<M, R, P, S, C>
where
    M: MovieRepository + Send + Sync + 'static,
    R: ReviewRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    C: Clock + 'static,
{
    pub fn new(
        movie_repo: Arc<M>,
        review_repo: Arc<R>,
        entitlements: Arc<EntitlementUseCase<P, S, C>>,
    ) -> Self {
        Self {
            movie_repo,
            review_repo,
            entitlements,
        }
    }

    pub async fn browse(&self, query: BrowseQueryModel) -> MovieResult<Vec<MovieModel>> {
        let q = query.q.map(|q| q.trim().to_string()).filter(|q| !q.is_empty());
        let genre = query
            .genre
            .map(|genre| genre.trim().to_string())
            .filter(|genre| !genre.is_empty());

        let movies = self.movie_repo.browse(q, genre).await.map_err(|err| {
            error!(db_error = ?err, "movies: browse query failed");
            MovieError::Internal(err)
        })?;

        Ok(movies.into_iter().map(MovieModel::from).collect())
    }

    /// Carousel picks: tagged Trending/Featured/Popular, falling back to the
    /// latest releases when too few movies are tagged.
    pub async fn featured(&self) -> MovieResult<Vec<MovieModel>> {
        let tagged = self
            .movie_repo
            .featured(FEATURED_LIMIT)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "movies: featured query failed");
                MovieError::Internal(err)
            })?;

        let picks = if tagged.len() < FEATURED_MINIMUM {
            self.movie_repo.latest(FEATURED_LIMIT).await.map_err(|err| {
                error!(db_error = ?err, "movies: latest query failed");
                MovieError::Internal(err)
            })?
        } else {
            tagged
        };

        Ok(picks.into_iter().map(MovieModel::from).collect())
    }

    /// Gated detail view: admins always pass, anonymous viewers are sent to
    /// login, and premium-tagged movies require an active subscription.
    pub async fn detail(
        &self,
        viewer: Option<Viewer>,
        movie_id: i64,
    ) -> MovieResult<MovieDetailModel> {
        let movie = self.find_movie(movie_id).await?;

        match access_gate::evaluate(viewer.as_ref(), movie.tags.as_deref()) {
            AccessDecision::Granted => {}
            AccessDecision::LoginRequired => {
                info!(movie_id, "movies: anonymous viewer sent to login");
                return Err(MovieError::LoginRequired);
            }
            AccessDecision::RequiresEntitlement => {
                let viewer = viewer.expect("gate requires an authenticated viewer");
                let entitled = self
                    .entitlements
                    .is_entitled(viewer.user_id)
                    .await
                    .map_err(|err| MovieError::Internal(err.into()))?;
                if !entitled {
                    warn!(
                        user_id = %viewer.user_id,
                        movie_id,
                        "movies: premium content without subscription"
                    );
                    return Err(MovieError::SubscriptionRequired);
                }
            }
        }

        let reviews = self
            .review_repo
            .list_by_movie(movie.id)
            .await
            .map_err(|err| {
                error!(movie_id, db_error = ?err, "movies: failed to load reviews");
                MovieError::Internal(err)
            })?;

        Ok(MovieDetailModel {
            movie: MovieModel::from(movie),
            reviews: reviews.into_iter().map(ReviewModel::from).collect(),
        })
    }

    pub async fn add_review(
        &self,
        viewer: Viewer,
        movie_id: i64,
        insert_review_model: InsertReviewModel,
    ) -> MovieResult<i64> {
        let movie = self.find_movie(movie_id).await?;

        let content = insert_review_model.content.trim().to_string();
        if content.is_empty() {
            return Err(MovieError::Validation(
                "please provide both review and rating".to_string(),
            ));
        }
        if !(1..=10).contains(&insert_review_model.rating) {
            return Err(MovieError::Validation(
                "rating must be between 1 and 10".to_string(),
            ));
        }

        let review = self
            .review_repo
            .add(InsertReviewEntity {
                user_id: viewer.user_id,
                movie_id: movie.id,
                content,
                rating: insert_review_model.rating,
            })
            .await
            .map_err(|err| {
                error!(movie_id, db_error = ?err, "movies: failed to insert review");
                MovieError::Internal(err)
            })?;

        info!(movie_id, review_id = review.id, "movies: review added");
        Ok(review.id)
    }

    pub async fn add_movie(&self, insert_movie_model: InsertMovieModel) -> MovieResult<MovieModel> {
        if insert_movie_model.title.trim().is_empty()
            || insert_movie_model.description.trim().is_empty()
        {
            return Err(MovieError::Validation(
                "title and description are required".to_string(),
            ));
        }

        let movie = self
            .movie_repo
            .add(insert_movie_model.into())
            .await
            .map_err(|err| {
                error!(db_error = ?err, "movies: failed to insert movie");
                MovieError::Internal(err)
            })?;

        info!(movie_id = movie.id, title = %movie.title, "movies: movie added");
        Ok(MovieModel::from(movie))
    }

    pub async fn edit_movie(
        &self,
        movie_id: i64,
        edit_movie_model: EditMovieModel,
    ) -> MovieResult<MovieModel> {
        if edit_movie_model.title.is_none()
            && edit_movie_model.description.is_none()
            && edit_movie_model.genre.is_none()
            && edit_movie_model.trailer_url.is_none()
            && edit_movie_model.poster_url.is_none()
            && edit_movie_model.release_date.is_none()
        {
            return Err(MovieError::Validation("nothing to update".to_string()));
        }

        let movie = self
            .movie_repo
            .edit(movie_id, edit_movie_model.into())
            .await
            .map_err(|err| {
                error!(movie_id, db_error = ?err, "movies: failed to update movie");
                MovieError::Internal(err)
            })?
            .ok_or(MovieError::NotFound)?;

        info!(movie_id, "movies: movie updated");
        Ok(MovieModel::from(movie))
    }

    pub async fn delete_movie(&self, movie_id: i64) -> MovieResult<()> {
        let deleted = self.movie_repo.delete(movie_id).await.map_err(|err| {
            error!(movie_id, db_error = ?err, "movies: failed to delete movie");
            MovieError::Internal(err)
        })?;

        if deleted == 0 {
            return Err(MovieError::NotFound);
        }

        info!(movie_id, "movies: movie deleted");
        Ok(())
    }

    async fn find_movie(
        &self,
        movie_id: i64,
    ) -> MovieResult<crate::domain::entities::movies::MovieEntity> {
        self.movie_repo
            .find_by_id(movie_id)
            .await
            .map_err(|err| {
                error!(movie_id, db_error = ?err, "movies: failed to load movie");
                MovieError::Internal(err)
            })?
            .ok_or(MovieError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use uuid::Uuid;

    use crate::domain::{
        clock::MockClock,
        entities::{movies::MovieEntity, subscriptions::SubscriptionEntity},
        repositories::{
            movies::MockMovieRepository, plans::MockPlanRepository,
            reviews::MockReviewRepository, subscriptions::MockSubscriptionRepository,
        },
    };

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn viewer(is_admin: bool) -> Viewer {
        Viewer {
            user_id: Uuid::parse_str("9f2c8d3e-1111-2222-3333-444455556666").unwrap(),
            is_admin,
        }
    }

    fn movie(id: i64, tags: Option<&str>) -> MovieEntity {
        MovieEntity {
            id,
            title: "Interstellar".to_string(),
            description: "Space and time".to_string(),
            genre: Some("Sci-Fi".to_string()),
            trailer_url: None,
            poster_url: None,
            release_date: None,
            language: None,
            runtime_minutes: Some(169),
            age_rating: None,
            imdb_rating: Some(8.7),
            tags: tags.map(str::to_string),
            created_at: t0(),
        }
    }

    fn active_grant(user_id: Uuid) -> SubscriptionEntity {
        SubscriptionEntity {
            id: 10,
            user_id,
            plan_id: 1,
            starts_at: t0(),
            ends_at: t0() + Duration::days(30),
            provider_ref: None,
            created_at: t0(),
        }
    }

    fn usecase(
        movie_repo: MockMovieRepository,
        review_repo: MockReviewRepository,
        subscription_repo: MockSubscriptionRepository,
    ) -> MovieUseCase<
        MockMovieRepository,
        MockReviewRepository,
        MockPlanRepository,
        MockSubscriptionRepository,
        MockClock,
    > {
        let mut clock = MockClock::new();
        clock.expect_now().returning(t0);
        let entitlements = Arc::new(EntitlementUseCase::new(
            Arc::new(MockPlanRepository::new()),
            Arc::new(subscription_repo),
            Arc::new(clock),
        ));
        MovieUseCase::new(Arc::new(movie_repo), Arc::new(review_repo), entitlements)
    }

    #[tokio::test]
    async fn test_detail_of_premium_movie_requires_subscription() {
        let mut movie_repo = MockMovieRepository::new();
        movie_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(movie(id, Some("Premium, Trending")))));

        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo
            .expect_find_active()
            .returning(|_, _| Ok(None));

        let movies = usecase(movie_repo, MockReviewRepository::new(), subscription_repo);

        let result = movies.detail(Some(viewer(false)), 1).await;
        assert!(matches!(result, Err(MovieError::SubscriptionRequired)));
    }

    #[tokio::test]
    async fn test_detail_of_premium_movie_passes_for_subscriber() {
        let mut movie_repo = MockMovieRepository::new();
        movie_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(movie(id, Some("Premium")))));

        let mut review_repo = MockReviewRepository::new();
        review_repo.expect_list_by_movie().returning(|_| Ok(vec![]));

        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo
            .expect_find_active()
            .returning(|user_id, _| Ok(Some(active_grant(user_id))));

        let movies = usecase(movie_repo, review_repo, subscription_repo);

        let detail = movies.detail(Some(viewer(false)), 1).await.unwrap();
        assert_eq!(detail.movie.id, 1);
    }

    #[tokio::test]
    async fn test_detail_without_login_is_redirected() {
        let mut movie_repo = MockMovieRepository::new();
        movie_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(movie(id, None))));

        let movies = usecase(
            movie_repo,
            MockReviewRepository::new(),
            MockSubscriptionRepository::new(),
        );

        let result = movies.detail(None, 1).await;
        assert!(matches!(result, Err(MovieError::LoginRequired)));
    }

    #[tokio::test]
    async fn test_detail_for_admin_skips_entitlement_lookup() {
        let mut movie_repo = MockMovieRepository::new();
        movie_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(movie(id, Some("Premium")))));

        let mut review_repo = MockReviewRepository::new();
        review_repo.expect_list_by_movie().returning(|_| Ok(vec![]));

        // No find_active expectation: an entitlement lookup would panic.
        let movies = usecase(movie_repo, review_repo, MockSubscriptionRepository::new());

        let detail = movies.detail(Some(viewer(true)), 1).await.unwrap();
        assert_eq!(detail.movie.id, 1);
    }

    #[tokio::test]
    async fn test_add_review_validates_rating_range() {
        let mut movie_repo = MockMovieRepository::new();
        movie_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(movie(id, None))));

        let movies = usecase(
            movie_repo,
            MockReviewRepository::new(),
            MockSubscriptionRepository::new(),
        );

        let result = movies
            .add_review(
                viewer(false),
                1,
                InsertReviewModel {
                    content: "Great".to_string(),
                    rating: 11,
                },
            )
            .await;
        assert!(matches!(result, Err(MovieError::Validation(_))));
    }

    #[tokio::test]
    async fn test_featured_falls_back_to_latest_when_sparse() {
        let mut movie_repo = MockMovieRepository::new();
        movie_repo
            .expect_featured()
            .returning(|_| Ok(vec![movie(1, Some("Trending"))]));
        movie_repo
            .expect_latest()
            .returning(|_| Ok(vec![movie(1, None), movie(2, None), movie(3, None)]));

        let movies = usecase(
            movie_repo,
            MockReviewRepository::new(),
            MockSubscriptionRepository::new(),
        );

        let picks = movies.featured().await.unwrap();
        assert_eq!(picks.len(), 3);
    }
}
