mod report_dto;
pub mod weight;

pub use report_dto::{
    CreateReportDto, ReportQueryParams, ReportResponseDto, UpdateStatusDto,
};
