pub mod event_form;
pub mod event_table;
pub mod score_card;
pub mod score_chart;
pub mod scoring_help;
