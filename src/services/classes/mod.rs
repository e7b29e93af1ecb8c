pub mod class;
pub mod sections;
pub mod subjects;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::ErrorCode;
use crate::models::classes::entities::{Class, Section, Subject};
use crate::models::classes::requests::{
    ClassQueryParams, CreateClassRequest, CreateSectionRequest, CreateSubjectRequest,
    SubjectQueryParams, UpdateClassRequest, UpdateSectionRequest, UpdateSubjectRequest,
};
use crate::models::users::entities::User;
use crate::storage::Storage;

use super::{bad_request, scoped_entity, storage_error};

super::define_service!(
    /// 班级、小组与科目
    ClassService
);

impl ClassService {
    pub async fn list_classes(
        &self,
        request: &HttpRequest,
        query: ClassQueryParams,
    ) -> ActixResult<HttpResponse> {
        class::list_classes(self, request, query).await
    }

    pub async fn create_class(
        &self,
        request: &HttpRequest,
        class_data: CreateClassRequest,
    ) -> ActixResult<HttpResponse> {
        class::create_class(self, request, class_data).await
    }

    pub async fn get_class(&self, request: &HttpRequest, class_id: i64) -> ActixResult<HttpResponse> {
        class::get_class(self, request, class_id).await
    }

    pub async fn update_class(
        &self,
        request: &HttpRequest,
        class_id: i64,
        update_data: UpdateClassRequest,
    ) -> ActixResult<HttpResponse> {
        class::update_class(self, request, class_id, update_data).await
    }

    pub async fn delete_class(
        &self,
        request: &HttpRequest,
        class_id: i64,
    ) -> ActixResult<HttpResponse> {
        class::delete_class(self, request, class_id).await
    }

    pub async fn list_sections(
        &self,
        request: &HttpRequest,
        class_id: i64,
    ) -> ActixResult<HttpResponse> {
        sections::list_sections(self, request, class_id).await
    }

    pub async fn create_section(
        &self,
        request: &HttpRequest,
        class_id: i64,
        section_data: CreateSectionRequest,
    ) -> ActixResult<HttpResponse> {
        sections::create_section(self, request, class_id, section_data).await
    }

    pub async fn update_section(
        &self,
        request: &HttpRequest,
        section_id: i64,
        update_data: UpdateSectionRequest,
    ) -> ActixResult<HttpResponse> {
        sections::update_section(self, request, section_id, update_data).await
    }

    pub async fn delete_section(
        &self,
        request: &HttpRequest,
        section_id: i64,
    ) -> ActixResult<HttpResponse> {
        sections::delete_section(self, request, section_id).await
    }

    pub async fn list_subjects(
        &self,
        request: &HttpRequest,
        query: SubjectQueryParams,
    ) -> ActixResult<HttpResponse> {
        subjects::list_subjects(self, request, query).await
    }

    pub async fn create_subject(
        &self,
        request: &HttpRequest,
        subject_data: CreateSubjectRequest,
    ) -> ActixResult<HttpResponse> {
        subjects::create_subject(self, request, subject_data).await
    }

    pub async fn update_subject(
        &self,
        request: &HttpRequest,
        subject_id: i64,
        update_data: UpdateSubjectRequest,
    ) -> ActixResult<HttpResponse> {
        subjects::update_subject(self, request, subject_id, update_data).await
    }

    pub async fn delete_subject(
        &self,
        request: &HttpRequest,
        subject_id: i64,
    ) -> ActixResult<HttpResponse> {
        subjects::delete_subject(self, request, subject_id).await
    }
}

pub(crate) async fn load_class(
    storage: &Arc<dyn Storage>,
    actor: &User,
    class_id: i64,
) -> Result<Class, HttpResponse> {
    scoped_entity(
        actor,
        storage.get_class_by_id(class_id).await,
        |c: &Class| c.school_id,
        ErrorCode::ClassNotFound,
        "Class",
    )
}

pub(crate) async fn load_section(
    storage: &Arc<dyn Storage>,
    actor: &User,
    section_id: i64,
) -> Result<Section, HttpResponse> {
    scoped_entity(
        actor,
        storage.get_section_by_id(section_id).await,
        |s: &Section| s.school_id,
        ErrorCode::SectionNotFound,
        "Section",
    )
}

pub(crate) async fn load_subject(
    storage: &Arc<dyn Storage>,
    actor: &User,
    subject_id: i64,
) -> Result<Subject, HttpResponse> {
    scoped_entity(
        actor,
        storage.get_subject_by_id(subject_id).await,
        |s: &Subject| s.school_id,
        ErrorCode::SubjectNotFound,
        "Subject",
    )
}

/// 校验班级下的小组与学校内的科目（用于考勤、作业）
pub(crate) async fn check_class_targets(
    storage: &Arc<dyn Storage>,
    class: &Class,
    section_id: Option<i64>,
    subject_id: Option<i64>,
) -> Result<(), HttpResponse> {
    if let Some(section_id) = section_id {
        match storage.get_section_by_id(section_id).await {
            Ok(Some(section)) if section.class_id == class.id => {}
            Ok(_) => {
                return Err(bad_request(
                    ErrorCode::SectionNotFound,
                    "section_id does not belong to the class",
                ));
            }
            Err(e) => return Err(storage_error("Failed to check section", e)),
        }
    }
    if let Some(subject_id) = subject_id {
        match storage.get_subject_by_id(subject_id).await {
            Ok(Some(subject)) if subject.school_id == class.school_id => {}
            Ok(_) => {
                return Err(bad_request(
                    ErrorCode::SubjectNotFound,
                    "subject_id does not belong to the class's school",
                ));
            }
            Err(e) => return Err(storage_error("Failed to check subject", e)),
        }
    }
    Ok(())
}
