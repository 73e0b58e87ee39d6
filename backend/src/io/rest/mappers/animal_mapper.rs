use shared::{Animal, AnimalListRequest, AnimalRequest};

use crate::domain::commands::animals::AnimalListQuery;
use crate::domain::models::{AnimalDetails, AnimalRecord};
use crate::domain::query_filter::{AnimalFilter, Pagination};

pub struct AnimalMapper;

impl AnimalMapper {
    /// Convert a create/update request body to domain details
    pub fn to_domain(dto: AnimalRequest) -> AnimalDetails {
        AnimalDetails {
            external_id: dto.animal_id,
            animal_type: dto.animal_type,
            breed: dto.breed,
            color: dto.color,
            date_of_birth: dto.date_of_birth,
            date_of_outcome: dto.date_of_outcome,
            name: dto.name,
            outcome_subtype: dto.outcome_subtype,
            outcome_type: dto.outcome_type,
            sex_upon_outcome: dto.sex_upon_outcome,
            latitude: dto.location_lat,
            longitude: dto.location_long,
        }
    }

    /// Convert a stored record to the API shape, filling in the derived age fields
    pub fn to_dto(domain: AnimalRecord) -> Animal {
        let age = domain.age_upon_outcome();
        let details = domain.details;

        Animal {
            rec_num: domain.record_id,
            animal_id: details.external_id,
            animal_type: details.animal_type,
            breed: details.breed,
            color: details.color,
            date_of_birth: details.date_of_birth,
            date_of_outcome: details.date_of_outcome,
            name: details.name,
            outcome_subtype: details.outcome_subtype,
            outcome_type: details.outcome_type,
            sex_upon_outcome: details.sex_upon_outcome,
            location_lat: details.latitude,
            location_long: details.longitude,
            age_upon_outcome: age.text,
            age_upon_outcome_in_weeks: age.weeks,
        }
    }

    pub fn to_dto_list(domain_records: Vec<AnimalRecord>) -> Vec<Animal> {
        domain_records.into_iter().map(Self::to_dto).collect()
    }

    pub fn to_list_query(request: AnimalListRequest) -> AnimalListQuery {
        AnimalListQuery {
            filter: AnimalFilter {
                animal_type: request.animal_type,
                breeds: request.breed,
                sex_upon_outcome: request.sex_upon_outcome,
                min_age_weeks: request.min_age,
                max_age_weeks: request.max_age,
            },
            page: Pagination::new(request.skip, request.limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::animal::test_support::sample_details;

    #[test]
    fn test_to_dto_includes_derived_age() {
        let dto = AnimalMapper::to_dto(AnimalRecord::new(7, sample_details("A7")));

        assert_eq!(dto.rec_num, 7);
        assert_eq!(dto.animal_id, "A7");
        assert_eq!(dto.location_lat, 30.75);
        assert_eq!(dto.age_upon_outcome.as_deref(), Some("1 year"));
        assert_eq!(dto.age_upon_outcome_in_weeks, Some(75));
    }

    #[test]
    fn test_request_round_trips_through_domain() {
        let details = sample_details("A1");
        let request = AnimalRequest {
            animal_id: details.external_id.clone(),
            animal_type: details.animal_type.clone(),
            breed: details.breed.clone(),
            color: details.color.clone(),
            date_of_birth: details.date_of_birth,
            date_of_outcome: details.date_of_outcome,
            name: details.name.clone(),
            outcome_subtype: details.outcome_subtype.clone(),
            outcome_type: details.outcome_type.clone(),
            sex_upon_outcome: details.sex_upon_outcome.clone(),
            location_lat: details.latitude,
            location_long: details.longitude,
        };

        assert_eq!(AnimalMapper::to_domain(request), details);
    }

    #[test]
    fn test_list_request_defaults_pagination() {
        let query = AnimalMapper::to_list_query(AnimalListRequest {
            breed: vec!["Beagle".to_string()],
            min_age: Some(52),
            ..Default::default()
        });

        assert_eq!(query.page, Pagination::default());
        assert_eq!(query.filter.breeds, vec!["Beagle".to_string()]);
        assert_eq!(query.filter.min_age_weeks, Some(52));
        assert_eq!(query.filter.max_age_weeks, None);
    }
}
