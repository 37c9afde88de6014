pub mod d400_opportunity_analysis;
