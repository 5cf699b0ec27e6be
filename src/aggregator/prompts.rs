// src/aggregator/prompts.rs
//
// Static extraction instructions handed to the Firecrawl API, one per
// board. These are request parameters, not logic: each prompt carries the
// HTML-structure hints that board needs plus the expected output fields.

use super::Site;

const DEFAULT_PROMPT: &str = "\
Extract job titles and company names from job listings on this search results page. \
Job titles are typically in elements with class 'jobtitle' or within <h2> tags with class 'title' \
or <a> tags with 'data-tn-element=jobTitle'. \
Company names are typically in elements with class 'company' or 'companyName'. \
Focus on job cards (e.g., elements with class 'job_seen_beacon' or 'result'). \
Ignore ads, footers, navigation, or unrelated content. \
Return a JSON array of objects with fields: job_title, company_name.";

const INDEED_PROMPT: &str = "\
Extract job listings from this Indeed search results page. \
Each listing is a card with class 'job_seen_beacon'; the title is in a span inside the \
'jobTitle' heading, the employer in a span with 'data-testid=company-name', the location in \
'data-testid=text-location' and the pay range (when shown) in the 'salary-snippet' element. \
Ignore sponsored banners, footers and navigation. \
Return a JSON array of objects with fields: job_title, company_name, location, salary.";

const ADZUNA_PROMPT: &str = "\
Extract job listings from this Adzuna search results page. \
Listings are <article> elements; the title is the <h2> link text, the employer is in the \
'ui-company' element, the location in 'ui-location' and the salary in 'ui-salary'. \
Ignore adverts and related-search links. \
Return a JSON array of objects with fields: job_title, company_name, location, salary.";

const REED_PROMPT: &str = "\
Extract job listings from this Reed search results page. \
Each listing is a card with class 'job-card_jobCard'; the title is the <h2> link text, the \
employer is the 'gtmJobListingPostedBy' link, the location is in the 'job-card_jobMetadata' \
block and the salary line starts with a currency symbol. \
Ignore promoted courses and footer content. \
Return a JSON array of objects with fields: job_title, company_name, location, salary.";

/// Instructions for one board, falling back to the shared default for
/// boards without dedicated hints.
pub fn extraction_prompt(site: Site) -> &'static str {
    match site {
        Site::Indeed => INDEED_PROMPT,
        Site::Adzuna => ADZUNA_PROMPT,
        Site::Reed => REED_PROMPT,
        _ => DEFAULT_PROMPT,
    }
}
