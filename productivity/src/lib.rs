pub mod feed;
pub mod types;
pub mod step1_resolve;
pub mod step2_extract;
pub mod step3_ridership;
pub mod step4_merge;
pub mod step5_bin;
pub mod step6_productivity;
pub mod pipeline;
pub mod output;
#[cfg(test)]
mod tests;
