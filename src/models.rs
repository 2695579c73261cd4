//! Content entities stored in the remote document store.
//!
//! Every record carries the store-assigned `_id` plus optional creation and
//! update timestamps ([`RecordMeta`]). All other fields are optional: an
//! absent field is a valid state, not an error. Wire names are camelCase.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A record shape stored in one named collection.
///
/// Implemented by every entity type so the generic
/// [`DataService`](crate::store::DataService) can address its default
/// collection without per-type client code.
pub trait Entity: DeserializeOwned + Serialize + Send + Sync + 'static {
    /// Collection key used to address the remote store (e.g. `"blogposts"`).
    const COLLECTION: &'static str;

    fn meta(&self) -> &RecordMeta;

    fn id(&self) -> &str {
        &self.meta().id
    }
}

/// Fields shared by every record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordMeta {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_createdDate", default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(rename = "_updatedDate", default, skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<DateTime<Utc>>,
}

impl RecordMeta {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

macro_rules! impl_entity {
    ($ty:ty, $collection:literal) => {
        impl Entity for $ty {
            const COLLECTION: &'static str = $collection;

            fn meta(&self) -> &RecordMeta {
                &self.meta
            }
        }
    };
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    /// Either an ISO-8601 timestamp or a free-form date string.
    pub publish_date: Option<String>,
    pub featured_image: Option<String>,
}
impl_entity!(BlogPost, "blogposts");

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStudy {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub title: Option<String>,
    pub card_image: Option<String>,
    pub short_description: Option<String>,
    pub key_results: Option<String>,
    pub approach: Option<String>,
    pub outcomes: Option<String>,
}
impl_entity!(CaseStudy, "casestudies");

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faq {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<String>,
    pub display_order: Option<f64>,
    pub is_featured: Option<bool>,
}
impl_entity!(Faq, "faqs");

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingPlan {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub plan_name: Option<String>,
    pub plan_description: Option<String>,
    pub monthly_price: Option<f64>,
    pub features_summary: Option<String>,
    pub whats_app_messenger_automation_subscription: Option<f64>,
    pub whats_app_messenger_automation_setup: Option<f64>,
    pub linked_in_viral_post_automation: Option<f64>,
    pub comment_bot_price: Option<f64>,
    pub website_chatbot_price: Option<f64>,
    pub custom_automation_note: Option<String>,
    pub is_recommended: Option<bool>,
}
impl_entity!(PricingPlan, "pricingplans");

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub service_name: Option<String>,
    pub card_image: Option<String>,
    pub short_description: Option<String>,
    pub detailed_description: Option<String>,
    pub faq_question1: Option<String>,
    pub faq_answer1: Option<String>,
    pub faq_question2: Option<String>,
    pub faq_answer2: Option<String>,
}
impl_entity!(Service, "services");

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Solution {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub card_image: Option<String>,
    pub short_description: Option<String>,
    pub detailed_description: Option<String>,
    /// Newline-separated list.
    pub key_benefits: Option<String>,
}
impl_entity!(Solution, "solutions");

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub member_name: Option<String>,
    pub member_photo: Option<String>,
    pub member_role: Option<String>,
    pub member_bio: Option<String>,
    pub member_specialties: Option<String>,
    pub book_demo_url: Option<String>,
}
impl_entity!(TeamMember, "teammembers");

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub client_name: Option<String>,
    pub testimonial_text: Option<String>,
    pub client_role: Option<String>,
    pub company_name: Option<String>,
    pub company_logo: Option<String>,
    pub rating: Option<f64>,
    pub testimonial_date: Option<String>,
}
impl_entity!(Testimonial, "testimonials");

/// Collection keys of every entity type, in site navigation order.
pub const COLLECTIONS: [&str; 8] = [
    Service::COLLECTION,
    Solution::COLLECTION,
    CaseStudy::COLLECTION,
    BlogPost::COLLECTION,
    TeamMember::COLLECTION,
    PricingPlan::COLLECTION,
    Faq::COLLECTION,
    Testimonial::COLLECTION,
];
