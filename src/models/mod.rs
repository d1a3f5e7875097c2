// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Gender, LikeOutcome, LocationScope, Match, MatchEntry, MatchedUser, NewPreferences,
    NewProfile, NewPromptAnswer, ParseEnumError, Photo, Preferences, Profile, ProfileUpdate,
    Prompt, PromptAnswerView, ReceivedLike, Swipe, SwipeAction, User, UserCard, ANONYMOUS_NAME,
};
pub use requests::{
    AddPhotoRequest, AnswerPromptsRequest, CreateProfileRequest, CreateUserRequest,
    PreferencesRequest, PromptAnswerInput, SwipeRequest, UpdateProfileRequest,
};
pub use responses::{
    ApiResponse, ErrorResponse, HealthResponse, LikeResult, PaymentRequiredResponse,
    PaymentRequirement, PreferencesSaved, ProfileSaved, PromptsAnswered, ReportResult, Suggestion,
    UserCreated, UserDetails,
};
