//! Built-in service menu.
//!
//! One registration function per content family; [`register_all_services`]
//! is the single entry point the CLI and the HTTP server use to populate
//! a registry at startup. Each family shares one builder instance, with
//! descriptor params specializing it per title.

use std::sync::Arc;

use crate::builder::{
    AdCopyBuilder, ArticleBuilder, BookBuilder, BrandingBuilder, ContentBuilder, EmailBuilder,
    FunnelStepBuilder, LandingPageBuilder, LinkedInBuilder, PressReleaseBuilder, VslBuilder,
    WebinarBuilder,
};
use crate::llm::DeepSeekClient;
use crate::registry::{ServiceDescriptor, ServiceRegistry};

pub const CATEGORY_EMAIL: &str = "Email";
pub const CATEGORY_ARTICLES: &str = "Articles";
pub const CATEGORY_LANDING_PAGES: &str = "Landing Pages";
pub const CATEGORY_WEBSITE_PAGES: &str = "Website Pages";
pub const CATEGORY_VSL: &str = "VSL";
pub const CATEGORY_ADVERTISING: &str = "Advertising";
pub const CATEGORY_ADVERTORIALS: &str = "Advertorials";
pub const CATEGORY_PR: &str = "PR";
pub const CATEGORY_LINKEDIN: &str = "LinkedIn";
pub const CATEGORY_SALES_FUNNEL: &str = "Sales Funnel";
pub const CATEGORY_OPT_IN: &str = "Opt-in Pages";
pub const CATEGORY_UPSELLS: &str = "Upsells";
pub const CATEGORY_ORDER_BUMPS: &str = "Order Bumps";
pub const CATEGORY_BONUSES: &str = "Bonuses";
pub const CATEGORY_BIG_IDEAS: &str = "Big Ideas";
pub const CATEGORY_BOOKS: &str = "Books";
pub const CATEGORY_BRANDING: &str = "Branding";
pub const CATEGORY_WEBINARS: &str = "Webinars";

/// Build a registry holding the complete built-in catalog.
pub fn register_all_services(client: &Arc<DeepSeekClient>) -> ServiceRegistry {
    let mut registry = ServiceRegistry::new();
    register_email_services(&mut registry, client);
    register_article_services(&mut registry, client);
    register_landing_page_services(&mut registry, client);
    register_website_page_services(&mut registry, client);
    register_vsl_services(&mut registry, client);
    register_advertising_services(&mut registry, client);
    register_advertorial_services(&mut registry, client);
    register_pr_services(&mut registry, client);
    register_linkedin_services(&mut registry, client);
    register_funnel_services(&mut registry, client);
    register_book_services(&mut registry, client);
    register_branding_services(&mut registry, client);
    register_webinar_services(&mut registry, client);
    registry
}

fn entry(
    title: &str,
    category: &str,
    builder: &Arc<dyn ContentBuilder>,
    params: &[&str],
    description: &str,
) -> ServiceDescriptor {
    ServiceDescriptor::new(title, category, Arc::clone(builder))
        .with_params(params.iter().copied())
        .with_description(description)
}

fn register_email_services(registry: &mut ServiceRegistry, client: &Arc<DeepSeekClient>) {
    let b: Arc<dyn ContentBuilder> = Arc::new(EmailBuilder::new(Arc::clone(client)));
    registry.register_batch(vec![
        entry(
            "Welcome Email",
            CATEGORY_EMAIL,
            &b,
            &["welcome"],
            "Onboarding email for a new subscriber",
        ),
        entry(
            "Cart Abandonment Email",
            CATEGORY_EMAIL,
            &b,
            &["cart_abandonment"],
            "Recovery email for an abandoned checkout",
        ),
        entry(
            "Launch Sequence",
            CATEGORY_EMAIL,
            &b,
            &["launch_sequence"],
            "Three-part product launch email sequence",
        ),
        entry(
            "Re-engagement Email",
            CATEGORY_EMAIL,
            &b,
            &["re_engagement"],
            "Win-back email for inactive subscribers",
        ),
        entry(
            "Newsletter Issue",
            CATEGORY_EMAIL,
            &b,
            &["newsletter"],
            "Single newsletter issue with lead story",
        ),
        entry(
            "Broadcast Email",
            CATEGORY_EMAIL,
            &b,
            &["broadcast"],
            "One-off marketing broadcast",
        ),
    ]);
}

fn register_article_services(registry: &mut ServiceRegistry, client: &Arc<DeepSeekClient>) {
    let b: Arc<dyn ContentBuilder> = Arc::new(ArticleBuilder::new(Arc::clone(client)));
    registry.register_batch(vec![
        entry(
            "Blog Post",
            CATEGORY_ARTICLES,
            &b,
            &["blog_post"],
            "Standard long-form blog post",
        ),
        entry(
            "Listicle",
            CATEGORY_ARTICLES,
            &b,
            &["listicle"],
            "Numbered list article",
        ),
        entry(
            "How-to Guide",
            CATEGORY_ARTICLES,
            &b,
            &["how_to_guide"],
            "Step-by-step instructional article",
        ),
        entry(
            "Case Study",
            CATEGORY_ARTICLES,
            &b,
            &["case_study"],
            "Customer result narrative",
        ),
        entry(
            "Pillar Page",
            CATEGORY_ARTICLES,
            &b,
            &["pillar_page"],
            "Comprehensive topic hub article",
        ),
    ]);
}

fn register_landing_page_services(registry: &mut ServiceRegistry, client: &Arc<DeepSeekClient>) {
    let b: Arc<dyn ContentBuilder> = Arc::new(LandingPageBuilder::new(Arc::clone(client)));
    registry.register_batch(vec![
        entry(
            "Sales Page",
            CATEGORY_LANDING_PAGES,
            &b,
            &["sales_page"],
            "Long-form sales page",
        ),
        entry(
            "Squeeze Page",
            CATEGORY_LANDING_PAGES,
            &b,
            &["squeeze_page"],
            "Minimal email-capture page",
        ),
        entry(
            "Thank You Page",
            CATEGORY_LANDING_PAGES,
            &b,
            &["thank_you_page"],
            "Post-conversion confirmation page",
        ),
        entry(
            "Opt-in Page",
            CATEGORY_OPT_IN,
            &b,
            &["squeeze_page"],
            "Lead-magnet opt-in page",
        ),
    ]);
}

fn register_website_page_services(registry: &mut ServiceRegistry, client: &Arc<DeepSeekClient>) {
    let b: Arc<dyn ContentBuilder> = Arc::new(LandingPageBuilder::new(Arc::clone(client)));
    registry.register_batch(vec![
        entry(
            "Homepage",
            CATEGORY_WEBSITE_PAGES,
            &b,
            &["homepage"],
            "Site homepage copy",
        ),
        entry(
            "About Page",
            CATEGORY_WEBSITE_PAGES,
            &b,
            &["about_page"],
            "Company story page",
        ),
        entry(
            "Features Page",
            CATEGORY_WEBSITE_PAGES,
            &b,
            &["features_page"],
            "Product features page",
        ),
        entry(
            "Pricing Page",
            CATEGORY_WEBSITE_PAGES,
            &b,
            &["pricing_page"],
            "Pricing tiers page",
        ),
    ]);
}

fn register_vsl_services(registry: &mut ServiceRegistry, client: &Arc<DeepSeekClient>) {
    let b: Arc<dyn ContentBuilder> = Arc::new(VslBuilder::new(Arc::clone(client)));
    registry.register_batch(vec![
        entry(
            "VSL Script",
            CATEGORY_VSL,
            &b,
            &["script"],
            "Full video sales letter script",
        ),
        entry(
            "VSL Lead",
            CATEGORY_VSL,
            &b,
            &["lead"],
            "Opening hook section of a VSL",
        ),
        entry(
            "VSL Close",
            CATEGORY_VSL,
            &b,
            &["close"],
            "Closing offer section of a VSL",
        ),
    ]);
}

fn register_advertising_services(registry: &mut ServiceRegistry, client: &Arc<DeepSeekClient>) {
    let b: Arc<dyn ContentBuilder> = Arc::new(AdCopyBuilder::new(Arc::clone(client)));
    registry.register_batch(vec![
        entry(
            "Facebook Ad",
            CATEGORY_ADVERTISING,
            &b,
            &["facebook", "generic"],
            "Facebook feed ad copy",
        ),
        entry(
            "Google Ad",
            CATEGORY_ADVERTISING,
            &b,
            &["google", "generic"],
            "Google search ad copy",
        ),
        entry(
            "LinkedIn Ad",
            CATEGORY_ADVERTISING,
            &b,
            &["linkedin", "generic"],
            "LinkedIn sponsored content",
        ),
        entry(
            "YouTube Ad",
            CATEGORY_ADVERTISING,
            &b,
            &["youtube", "generic"],
            "YouTube pre-roll script",
        ),
        entry(
            "TikTok Ad",
            CATEGORY_ADVERTISING,
            &b,
            &["tiktok", "generic"],
            "Short-form TikTok ad script",
        ),
        entry(
            "E-commerce Facebook Ad",
            CATEGORY_ADVERTISING,
            &b,
            &["facebook", "e-commerce"],
            "Facebook ad tuned for online stores",
        ),
        entry(
            "SaaS Facebook Ad",
            CATEGORY_ADVERTISING,
            &b,
            &["facebook", "saas"],
            "Facebook ad tuned for software products",
        ),
    ]);
}

fn register_advertorial_services(registry: &mut ServiceRegistry, client: &Arc<DeepSeekClient>) {
    let b: Arc<dyn ContentBuilder> = Arc::new(AdCopyBuilder::new(Arc::clone(client)));
    registry.register_batch(vec![entry(
        "Advertorial",
        CATEGORY_ADVERTORIALS,
        &b,
        &["native", "generic"],
        "Editorial-style native ad",
    )]);
}

fn register_pr_services(registry: &mut ServiceRegistry, client: &Arc<DeepSeekClient>) {
    let b: Arc<dyn ContentBuilder> = Arc::new(PressReleaseBuilder::new(Arc::clone(client)));
    registry.register_batch(vec![
        entry(
            "Press Release",
            CATEGORY_PR,
            &b,
            &["press_release"],
            "Standard announcement press release",
        ),
        entry(
            "Media Pitch",
            CATEGORY_PR,
            &b,
            &["media_pitch"],
            "Short pitch email to a journalist",
        ),
        entry(
            "Company Boilerplate",
            CATEGORY_PR,
            &b,
            &["boilerplate"],
            "Reusable about-the-company paragraph",
        ),
    ]);
}

fn register_linkedin_services(registry: &mut ServiceRegistry, client: &Arc<DeepSeekClient>) {
    let b: Arc<dyn ContentBuilder> = Arc::new(LinkedInBuilder::new(Arc::clone(client)));
    registry.register_batch(vec![
        entry(
            "Profile Headline",
            CATEGORY_LINKEDIN,
            &b,
            &["profile_headline"],
            "LinkedIn profile headline",
        ),
        entry(
            "Profile Summary",
            CATEGORY_LINKEDIN,
            &b,
            &["profile_summary"],
            "LinkedIn about section",
        ),
        entry(
            "Experience Entry",
            CATEGORY_LINKEDIN,
            &b,
            &["experience_entry"],
            "Single work-history entry",
        ),
        entry(
            "Outreach Message",
            CATEGORY_LINKEDIN,
            &b,
            &["outreach_message"],
            "Cold connection message",
        ),
        entry(
            "Company Page",
            CATEGORY_LINKEDIN,
            &b,
            &["company_page"],
            "Company page description",
        ),
    ]);
}

fn register_funnel_services(registry: &mut ServiceRegistry, client: &Arc<DeepSeekClient>) {
    let b: Arc<dyn ContentBuilder> = Arc::new(FunnelStepBuilder::new(Arc::clone(client)));
    registry.register_batch(vec![
        entry(
            "Funnel Overview",
            CATEGORY_SALES_FUNNEL,
            &b,
            &["overview"],
            "End-to-end funnel copy plan",
        ),
        entry(
            "Bridge Page",
            CATEGORY_SALES_FUNNEL,
            &b,
            &["bridge"],
            "Pre-frame page between traffic and offer",
        ),
        entry(
            "Lead Magnet Opt-in",
            CATEGORY_OPT_IN,
            &b,
            &["opt_in"],
            "Opt-in copy for a lead magnet",
        ),
        entry(
            "Upsell Offer",
            CATEGORY_UPSELLS,
            &b,
            &["upsell"],
            "Post-purchase upsell page",
        ),
        entry(
            "Downsell Offer",
            CATEGORY_UPSELLS,
            &b,
            &["downsell"],
            "Fallback offer after a declined upsell",
        ),
        entry(
            "Order Bump",
            CATEGORY_ORDER_BUMPS,
            &b,
            &["order_bump"],
            "Checkout add-on blurb",
        ),
        entry(
            "Bonus Stack",
            CATEGORY_BONUSES,
            &b,
            &["bonus_stack"],
            "Stacked bonus descriptions for an offer",
        ),
        entry(
            "Big Idea",
            CATEGORY_BIG_IDEAS,
            &b,
            &["big_idea"],
            "Core marketing angle for a campaign",
        ),
    ]);
}

fn register_book_services(registry: &mut ServiceRegistry, client: &Arc<DeepSeekClient>) {
    let b: Arc<dyn ContentBuilder> = Arc::new(BookBuilder::new(Arc::clone(client)));
    registry.register_batch(vec![
        entry(
            "Book Outline",
            CATEGORY_BOOKS,
            &b,
            &["outline"],
            "Chapter-by-chapter book outline",
        ),
        entry(
            "Book Chapter",
            CATEGORY_BOOKS,
            &b,
            &["chapter"],
            "Single book chapter draft",
        ),
        entry(
            "Book Titles",
            CATEGORY_BOOKS,
            &b,
            &["titles"],
            "Title and subtitle candidates",
        ),
        entry(
            "Back Cover Copy",
            CATEGORY_BOOKS,
            &b,
            &["back_cover"],
            "Back cover sales copy",
        ),
    ]);
}

fn register_branding_services(registry: &mut ServiceRegistry, client: &Arc<DeepSeekClient>) {
    let b: Arc<dyn ContentBuilder> = Arc::new(BrandingBuilder::new(Arc::clone(client)));
    registry.register_batch(vec![
        entry(
            "Taglines",
            CATEGORY_BRANDING,
            &b,
            &["taglines"],
            "Tagline candidates",
        ),
        entry(
            "Mission Statement",
            CATEGORY_BRANDING,
            &b,
            &["mission"],
            "Company mission statement",
        ),
        entry(
            "Value Propositions",
            CATEGORY_BRANDING,
            &b,
            &["value_props"],
            "Value proposition set",
        ),
        entry(
            "Brand Story",
            CATEGORY_BRANDING,
            &b,
            &["brand_story"],
            "Narrative origin story",
        ),
    ]);
}

fn register_webinar_services(registry: &mut ServiceRegistry, client: &Arc<DeepSeekClient>) {
    let b: Arc<dyn ContentBuilder> = Arc::new(WebinarBuilder::new(Arc::clone(client)));
    registry.register_batch(vec![
        entry(
            "Webinar Registration Page",
            CATEGORY_WEBINARS,
            &b,
            &["registration_page"],
            "Webinar signup page copy",
        ),
        entry(
            "Webinar Slide Outline",
            CATEGORY_WEBINARS,
            &b,
            &["slide_outline"],
            "Slide-by-slide presentation outline",
        ),
        entry(
            "Webinar Promo Sequence",
            CATEGORY_WEBINARS,
            &b,
            &["promo_sequence"],
            "Promotional emails before the webinar",
        ),
        entry(
            "Webinar Follow-up",
            CATEGORY_WEBINARS,
            &b,
            &["follow_up"],
            "Replay and pitch follow-up emails",
        ),
        entry(
            "Webinar Title Hooks",
            CATEGORY_WEBINARS,
            &b,
            &["title_hooks"],
            "Webinar title candidates",
        ),
    ]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmConfig;

    fn catalog() -> ServiceRegistry {
        let client =
            Arc::new(DeepSeekClient::new(LlmConfig::new("test-key")).expect("client builds"));
        register_all_services(&client)
    }

    #[test]
    fn catalog_is_populated() {
        let registry = catalog();
        assert!(registry.len() >= 45, "catalog holds {} entries", registry.len());
        assert!(registry.categories().len() >= 15);
    }

    #[test]
    fn every_entry_passes_validation() {
        let registry = catalog();
        for descriptor in registry.all() {
            let report = registry.validate(&descriptor.title, descriptor.category.as_deref());
            assert!(
                report.is_valid,
                "{:?} failed validation: {:?}",
                descriptor.title, report.errors
            );
        }
    }

    #[test]
    fn known_titles_resolve_in_their_category() {
        let registry = catalog();
        for (title, category) in [
            ("Welcome Email", CATEGORY_EMAIL),
            ("Sales Page", CATEGORY_LANDING_PAGES),
            ("Facebook Ad", CATEGORY_ADVERTISING),
            ("Order Bump", CATEGORY_ORDER_BUMPS),
            ("Webinar Follow-up", CATEGORY_WEBINARS),
        ] {
            assert!(
                registry.resolve(title, category).is_some(),
                "{title:?} missing from {category:?}"
            );
        }
    }

    #[test]
    fn platform_params_specialize_the_ad_builder() {
        let registry = catalog();
        let ad = registry
            .get("E-commerce Facebook Ad", Some(CATEGORY_ADVERTISING))
            .expect("registered");
        assert_eq!(ad.params, vec!["facebook", "e-commerce"]);
        assert_eq!(ad.builder.name(), "ad_copy");
    }
}
