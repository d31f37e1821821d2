//! Historical events and their sub-kind catalog

use serde::{Deserialize, Serialize};

use crate::core::calendar::Timestamp;
use crate::core::types::{Kind, RecordId, Reference};
use crate::schema::catalog::record_catalog;
use crate::schema::fields::{FieldReader, FromRaw};

/// One dated happening. The `details` variant is selected by the record's
/// `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalEvent {
    pub id: RecordId,
    pub timestamp: Timestamp,
    pub details: EventDetails,
}

impl HistoricalEvent {
    pub fn kind_name(&self) -> &str {
        self.details.kind_name()
    }

    pub fn references(&self) -> Vec<Reference> {
        self.details.references()
    }

    /// Whether this event names `(kind, id)` in any of its reference fields
    pub fn mentions(&self, kind: Kind, id: RecordId) -> bool {
        self.references()
            .iter()
            .any(|r| r.kind == kind && r.id == id)
    }
}

impl FromRaw for HistoricalEvent {
    fn from_raw(reader: &mut FieldReader<'_>) -> Self {
        let id = reader.int("id");
        let timestamp = Timestamp::new(reader.int("year"), reader.int("seconds72"));
        let type_tag = reader.text("type");
        let details = EventDetails::read(&type_tag, reader);
        Self {
            id,
            timestamp,
            details,
        }
    }
}

record_catalog! {
    /// Sub-kind payload of a [`HistoricalEvent`]
    pub enum EventDetails;

    AddHfEntityHonor = "add hf entity honor" {
        hfid: i32 => HistoricalFigure,
        entity_id: i32 => Entity,
        honor_id: i32,
    }
    AddHfEntityLink = "add hf entity link" {
        hfid: i32 => HistoricalFigure,
        civ_id: i32 => Entity,
        link: String,
        position: String,
        appointer_hfid: i32 => HistoricalFigure,
        promise_to_hfid: i32 => HistoricalFigure,
    }
    AddHfHfLink = "add hf hf link" {
        hfid: i32 => HistoricalFigure,
        hfid_target: i32 => HistoricalFigure,
        link_type: String,
    }
    AddHfSiteLink = "add hf site link" {
        histfig: i32 => HistoricalFigure,
        site_id: i32 => Site,
        structure: i32,
        civ: i32 => Entity,
        link_type: String,
    }
    AgreementConcluded = "agreement concluded" {
        topic: String,
        source: i32 => Entity,
        destination: i32 => Entity,
        site: i32 => Site,
    }
    AgreementFormed = "agreement formed" {
        agreement_id: i32,
        action: String,
        reason: String,
        concluder_hfid: i32 => HistoricalFigure,
    }
    AgreementMade = "agreement made" {
        topic: String,
        source: i32 => Entity,
        destination: i32 => Entity,
        site_id: i32 => Site,
    }
    AgreementRejected = "agreement rejected" {
        topic: String,
        source: i32 => Entity,
        destination: i32 => Entity,
        site_id: i32 => Site,
    }
    ArtifactClaimFormed = "artifact claim formed" {
        artifact_id: i32 => Artifact,
        hist_figure_id: i32 => HistoricalFigure,
        entity_id: i32 => Entity,
        claim: String,
        position_profile_id: i32,
    }
    ArtifactCopied = "artifact copied" {
        artifact_id: i32 => Artifact,
        dest_site_id: i32 => Site,
        dest_structure_id: i32,
        dest_entity_id: i32 => Entity,
        source_site_id: i32 => Site,
        source_structure_id: i32,
        source_entity_id: i32 => Entity,
        from_original: bool,
    }
    ArtifactCreated = "artifact created" {
        artifact_id: i32 => Artifact,
        hist_figure_id: i32 => HistoricalFigure,
        site_id: i32 => Site,
        unit_id: i32,
        name_only: bool,
        reason: String,
        sanctify_hf: i32 => HistoricalFigure,
    }
    ArtifactDestroyed = "artifact destroyed" {
        artifact_id: i32 => Artifact,
        site_id: i32 => Site,
        destroyer_enid: i32 => Entity,
    }
    ArtifactFound = "artifact found" {
        artifact_id: i32 => Artifact,
        hist_figure_id: i32 => HistoricalFigure,
        site_id: i32 => Site,
        unit_id: i32,
    }
    ArtifactGiven = "artifact given" {
        artifact_id: i32 => Artifact,
        giver_hist_figure_id: i32 => HistoricalFigure,
        giver_entity_id: i32 => Entity,
        receiver_hist_figure_id: i32 => HistoricalFigure,
        receiver_entity_id: i32 => Entity,
        reason: String,
    }
    ArtifactLost = "artifact lost" {
        artifact_id: i32 => Artifact,
        site_id: i32 => Site,
        subregion_id: i32 => Region,
        feature_layer_id: i32 => UndergroundRegion,
        site_property_id: i32,
    }
    ArtifactPossessed = "artifact possessed" {
        artifact_id: i32 => Artifact,
        hist_figure_id: i32 => HistoricalFigure,
        site_id: i32 => Site,
        subregion_id: i32 => Region,
        feature_layer_id: i32 => UndergroundRegion,
        unit_id: i32,
        reason: String,
        circumstance: String,
    }
    ArtifactRecovered = "artifact recovered" {
        artifact_id: i32 => Artifact,
        hist_figure_id: i32 => HistoricalFigure,
        site_id: i32 => Site,
        structure_id: i32,
        subregion_id: i32 => Region,
        feature_layer_id: i32 => UndergroundRegion,
        unit_id: i32,
    }
    ArtifactStored = "artifact stored" {
        artifact_id: i32 => Artifact,
        hist_figure_id: i32 => HistoricalFigure,
        site_id: i32 => Site,
        unit_id: i32,
    }
    AssumeIdentity = "assume identity" {
        trickster_hfid: i32 => HistoricalFigure,
        identity_id: i32 => Identity,
        target_enid: i32 => Entity,
    }
    AttackedSite = "attacked site" {
        attacker_civ_id: i32 => Entity,
        defender_civ_id: i32 => Entity,
        site_civ_id: i32 => Entity,
        site_id: i32 => Site,
        attacker_general_hfid: i32 => HistoricalFigure,
        defender_general_hfid: i32 => HistoricalFigure,
        attacker_merc_enid: i32 => Entity,
        defender_merc_enid: i32 => Entity,
        a_support_merc_enid: i32 => Entity,
        d_support_merc_enid: i32 => Entity,
    }
    BodyAbused = "body abused" {
        bodies: Vec<i32> => HistoricalFigure,
        histfig: i32 => HistoricalFigure,
        civ: i32 => Entity,
        site_id: i32 => Site,
        subregion_id: i32 => Region,
        feature_layer_id: i32 => UndergroundRegion,
        abuse_type: String,
        item_type: String,
        item_subtype: String,
        pile_type: String,
    }
    BuildingProfileAcquired = "building profile acquired" {
        site_id: i32 => Site,
        building_profile_id: i32,
        acquirer_hfid: i32 => HistoricalFigure,
        acquirer_enid: i32 => Entity,
        last_owner_hfid: i32 => HistoricalFigure,
        inherited: bool,
        purchased_unowned: bool,
        rebuilt_ruined: bool,
    }
    Ceremony = "ceremony" {
        civ_id: i32 => Entity,
        site_id: i32 => Site,
        subregion_id: i32 => Region,
        feature_layer_id: i32 => UndergroundRegion,
        occasion_id: i32,
        schedule_id: i32,
    }
    ChangeHfBodyState = "change hf body state" {
        hfid: i32 => HistoricalFigure,
        site_id: i32 => Site,
        structure_id: i32,
        subregion_id: i32 => Region,
        feature_layer_id: i32 => UndergroundRegion,
        body_state: String,
    }
    ChangeHfJob = "change hf job" {
        hfid: i32 => HistoricalFigure,
        site_id: i32 => Site,
        subregion_id: i32 => Region,
        feature_layer_id: i32 => UndergroundRegion,
        new_job: String,
        old_job: String,
    }
    ChangeHfState = "change hf state" {
        hfid: i32 => HistoricalFigure,
        site_id: i32 => Site,
        subregion_id: i32 => Region,
        feature_layer_id: i32 => UndergroundRegion,
        state: String,
        reason: String,
        mood: String,
    }
    ChangedCreatureType = "changed creature type" {
        changee_hfid: i32 => HistoricalFigure,
        changer_hfid: i32 => HistoricalFigure,
        old_race: String,
        old_caste: String,
        new_race: String,
        new_caste: String,
    }
    Competition = "competition" {
        civ_id: i32 => Entity,
        site_id: i32 => Site,
        subregion_id: i32 => Region,
        feature_layer_id: i32 => UndergroundRegion,
        occasion_id: i32,
        schedule_id: i32,
        competitor_hfid: Vec<i32> => HistoricalFigure,
        winner_hfid: i32 => HistoricalFigure,
    }
    CreateEntityPosition = "create entity position" {
        histfig: i32 => HistoricalFigure,
        civ: i32 => Entity,
        site_civ: i32 => Entity,
        position: String,
        reason: String,
    }
    CreatedSite = "created site" {
        civ_id: i32 => Entity,
        site_civ_id: i32 => Entity,
        site_id: i32 => Site,
        builder_hfid: i32 => HistoricalFigure,
        resident_civ_id: i32 => Entity,
    }
    CreatedStructure = "created structure" {
        civ_id: i32 => Entity,
        site_civ_id: i32 => Entity,
        site_id: i32 => Site,
        structure_id: i32,
        builder_hfid: i32 => HistoricalFigure,
        rebuilt: bool,
    }
    CreatedWorldConstruction = "created world construction" {
        civ_id: i32 => Entity,
        site_civ_id: i32 => Entity,
        wcid: i32 => WorldConstruction,
        master_wcid: i32 => WorldConstruction,
        site_id1: i32 => Site,
        site_id2: i32 => Site,
    }
    CreatureDevoured = "creature devoured" {
        victim: i32 => HistoricalFigure,
        eater: i32 => HistoricalFigure,
        entity: i32 => Entity,
        site_id: i32 => Site,
        subregion_id: i32 => Region,
        feature_layer_id: i32 => UndergroundRegion,
        race: String,
        caste: String,
    }
    DanceFormCreated = "dance form created" {
        form_id: i32 => DanceForm,
        hist_figure_id: i32 => HistoricalFigure,
        site_id: i32 => Site,
        reason: String,
        reason_id: i32,
        circumstance: String,
        circumstance_id: i32,
    }
    DiplomatLost = "diplomat lost" {
        entity: i32 => Entity,
        involved: i32 => Entity,
        site_id: i32 => Site,
    }
    EntityAllianceFormed = "entity alliance formed" {
        initiating_enid: i32 => Entity,
        joining_enid: Vec<i32> => Entity,
    }
    EntityBreachFeatureLayer = "entity breach feature layer" {
        civ_entity_id: i32 => Entity,
        site_entity_id: i32 => Entity,
        site_id: i32 => Site,
        feature_layer_id: i32 => UndergroundRegion,
    }
    EntityCreated = "entity created" {
        entity_id: i32 => Entity,
        site_id: i32 => Site,
        structure_id: i32,
        creator_hfid: i32 => HistoricalFigure,
    }
    EntityDissolved = "entity dissolved" {
        entity_id: i32 => Entity,
        reason: String,
    }
    EntityEquipmentPurchase = "entity equipment purchase" {
        entity_id: i32 => Entity,
        hfid: Vec<i32> => HistoricalFigure,
        new_equipment_level: i32,
    }
    EntityIncorporated = "entity incorporated" {
        joiner_entity_id: i32 => Entity,
        joined_entity_id: i32 => Entity,
        leader_hfid: i32 => HistoricalFigure,
        site_id: i32 => Site,
        partial_incorporation: bool,
    }
    EntityLaw = "entity law" {
        entity_id: i32 => Entity,
        hist_figure_id: i32 => HistoricalFigure,
        law_add: String,
        law_remove: String,
    }
    EntityOverthrown = "entity overthrown" {
        entity_id: i32 => Entity,
        site_id: i32 => Site,
        instigator_hfid: i32 => HistoricalFigure,
        overthrown_hfid: i32 => HistoricalFigure,
        pos_taker_hfid: i32 => HistoricalFigure,
        conspirator_hfid: Vec<i32> => HistoricalFigure,
        position_profile_id: i32,
    }
    EntityPersecuted = "entity persecuted" {
        persecutor_enid: i32 => Entity,
        persecutor_hfid: i32 => HistoricalFigure,
        target_enid: i32 => Entity,
        site_id: i32 => Site,
        expelled_hfid: Vec<i32> => HistoricalFigure,
        property_confiscated_from_hfid: Vec<i32> => HistoricalFigure,
        destroyed_structure_id: i32,
        shrine_amount_destroyed: i32,
    }
    EntityPrimaryCriminals = "entity primary criminals" {
        entity_id: i32 => Entity,
        site_id: i32 => Site,
        structure_id: i32,
        action: String,
    }
    EntityRampagedInSite = "entity rampaged in site" {
        rampage_civ_id: i32 => Entity,
        site_id: i32 => Site,
    }
    EntityRelocate = "entity relocate" {
        entity_id: i32 => Entity,
        site_id: i32 => Site,
        structure_id: i32,
        action: String,
    }
    EntitySearchedSite = "entity searched site" {
        searcher_civ_id: i32 => Entity,
        site_id: i32 => Site,
        result: String,
    }
    FailedFrameAttempt = "failed frame attempt" {
        target_hfid: i32 => HistoricalFigure,
        convicter_enid: i32 => Entity,
        fooled_hfid: i32 => HistoricalFigure,
        framer_hfid: i32 => HistoricalFigure,
        plotter_hfid: i32 => HistoricalFigure,
        crime: String,
    }
    FailedIntrigueCorruption = "failed intrigue corruption" {
        corruptor_hfid: i32 => HistoricalFigure,
        target_hfid: i32 => HistoricalFigure,
        site_id: i32 => Site,
        subregion_id: i32 => Region,
        feature_layer_id: i32 => UndergroundRegion,
        action: String,
        method: String,
    }
    FieldBattle = "field battle" {
        attacker_civ_id: i32 => Entity,
        defender_civ_id: i32 => Entity,
        attacker_general_hfid: i32 => HistoricalFigure,
        defender_general_hfid: i32 => HistoricalFigure,
        subregion_id: i32 => Region,
        feature_layer_id: i32 => UndergroundRegion,
        attacker_merc_enid: i32 => Entity,
        defender_merc_enid: i32 => Entity,
        coords: String,
    }
    FirstContact = "first contact" {
        contactor_enid: i32 => Entity,
        contacted_enid: i32 => Entity,
        site_id: i32 => Site,
    }
    Gamble = "gamble" {
        gambler_hfid: i32 => HistoricalFigure,
        site_id: i32 => Site,
        structure_id: i32,
        old_account: i32,
        new_account: i32,
    }
    HfAbducted = "hf abducted" {
        target_hfid: i32 => HistoricalFigure,
        snatcher_hfid: i32 => HistoricalFigure,
        site_id: i32 => Site,
        subregion_id: i32 => Region,
        feature_layer_id: i32 => UndergroundRegion,
    }
    HfAttackedSite = "hf attacked site" {
        attacker_hfid: i32 => HistoricalFigure,
        defender_civ_id: i32 => Entity,
        site_civ_id: i32 => Entity,
        site_id: i32 => Site,
    }
    HfConfronted = "hf confronted" {
        hfid: i32 => HistoricalFigure,
        situation: String,
        reason: Vec<String>,
        site_id: i32 => Site,
        subregion_id: i32 => Region,
        feature_layer_id: i32 => UndergroundRegion,
    }
    HfConvicted = "hf convicted" {
        convicted_hfid: i32 => HistoricalFigure,
        convicter_enid: i32 => Entity,
        crime: String,
        prison_months: i32,
        fooled_hfid: i32 => HistoricalFigure,
        framer_hfid: i32 => HistoricalFigure,
        corrupt_convicter_hfid: i32 => HistoricalFigure,
        exiled: bool,
        death_penalty: bool,
    }
    HfDestroyedSite = "hf destroyed site" {
        attacker_hfid: i32 => HistoricalFigure,
        defender_civ_id: i32 => Entity,
        site_civ_id: i32 => Entity,
        site_id: i32 => Site,
    }
    HfDied = "hf died" {
        hfid: i32 => HistoricalFigure,
        slayer_hfid: i32 => HistoricalFigure,
        slayer_race: String,
        slayer_caste: String,
        slayer_item_id: i32,
        slayer_shooter_item_id: i32,
        site_id: i32 => Site,
        subregion_id: i32 => Region,
        feature_layer_id: i32 => UndergroundRegion,
        cause: String,
    }
    HfDisturbedStructure = "hf disturbed structure" {
        hist_fig_id: i32 => HistoricalFigure,
        site_id: i32 => Site,
        structure_id: i32,
    }
    HfDoesInteraction = "hf does interaction" {
        doer_hfid: i32 => HistoricalFigure,
        target_hfid: i32 => HistoricalFigure,
        interaction: String,
        interaction_action: String,
        site: i32 => Site,
        region: i32 => Region,
    }
    HfEnslaved = "hf enslaved" {
        enslaved_hfid: i32 => HistoricalFigure,
        seller_hfid: i32 => HistoricalFigure,
        payer_entity_id: i32 => Entity,
        moved_to_site_id: i32 => Site,
    }
    HfEquipmentPurchase = "hf equipment purchase" {
        group_hfid: i32 => HistoricalFigure,
        site_id: i32 => Site,
        structure_id: i32,
        quality: i32,
    }
    HfGainsSecretGoal = "hf gains secret goal" {
        hfid: i32 => HistoricalFigure,
        secret_goal: String,
    }
    HfInterrogated = "hf interrogated" {
        target_hfid: i32 => HistoricalFigure,
        interrogator_hfid: i32 => HistoricalFigure,
        arresting_enid: i32 => Entity,
        wanted_and_recognized: bool,
        held_firm_in_interrogation: bool,
    }
    HfLearnsSecret = "hf learns secret" {
        student_hfid: i32 => HistoricalFigure,
        teacher_hfid: i32 => HistoricalFigure,
        artifact_id: i32 => Artifact,
        interaction: String,
    }
    HfNewPet = "hf new pet" {
        group_hfid: i32 => HistoricalFigure,
        site_id: i32 => Site,
        subregion_id: i32 => Region,
        feature_layer_id: i32 => UndergroundRegion,
        pets: Vec<String>,
    }
    HfPerformedHorribleExperiments = "hf performed horrible experiments" {
        group_hfid: i32 => HistoricalFigure,
        site_id: i32 => Site,
        structure_id: i32,
        subregion_id: i32 => Region,
        feature_layer_id: i32 => UndergroundRegion,
    }
    HfPrayedInsideStructure = "hf prayed inside structure" {
        hist_fig_id: i32 => HistoricalFigure,
        site_id: i32 => Site,
        structure_id: i32,
    }
    HfPreach = "hf preach" {
        speaker_hfid: i32 => HistoricalFigure,
        site_hfid: i32 => Site,
        entity_1: i32 => Entity,
        entity_2: i32 => Entity,
        topic: String,
    }
    HfProfanedStructure = "hf profaned structure" {
        hist_fig_id: i32 => HistoricalFigure,
        site_id: i32 => Site,
        structure_id: i32,
    }
    HfRansomed = "hf ransomed" {
        ransomed_hfid: i32 => HistoricalFigure,
        ransomer_hfid: i32 => HistoricalFigure,
        payer_hfid: i32 => HistoricalFigure,
        payer_entity_id: i32 => Entity,
        moved_to_site_id: i32 => Site,
    }
    HfReachSummit = "hf reach summit" {
        group_hfid: Vec<i32> => HistoricalFigure,
        subregion_id: i32 => Region,
        feature_layer_id: i32 => UndergroundRegion,
    }
    HfRecruitedUnitTypeForEntity = "hf recruited unit type for entity" {
        hfid: i32 => HistoricalFigure,
        entity_id: i32 => Entity,
        site_id: i32 => Site,
        subregion_id: i32 => Region,
        feature_layer_id: i32 => UndergroundRegion,
        unit_type: String,
    }
    HfRelationshipDenied = "hf relationship denied" {
        seeker_hfid: i32 => HistoricalFigure,
        target_hfid: i32 => HistoricalFigure,
        relationship: String,
        reason: String,
        reason_id: i32 => HistoricalFigure,
        site_id: i32 => Site,
        subregion_id: i32 => Region,
        feature_layer_id: i32 => UndergroundRegion,
    }
    HfReunion = "hf reunion" {
        group_1_hfid: i32 => HistoricalFigure,
        group_2_hfid: Vec<i32> => HistoricalFigure,
        site_id: i32 => Site,
        subregion_id: i32 => Region,
        feature_layer_id: i32 => UndergroundRegion,
    }
    HfRevived = "hf revived" {
        hfid: i32 => HistoricalFigure,
        actor_hfid: i32 => HistoricalFigure,
        site_id: i32 => Site,
        subregion_id: i32 => Region,
        feature_layer_id: i32 => UndergroundRegion,
        ghost: String,
        raised_before: bool,
        disturbance: bool,
    }
    HfSimpleBattleEvent = "hf simple battle event" {
        group_1_hfid: i32 => HistoricalFigure,
        group_2_hfid: i32 => HistoricalFigure,
        site_id: i32 => Site,
        subregion_id: i32 => Region,
        feature_layer_id: i32 => UndergroundRegion,
        subtype: String,
    }
    HfTravel = "hf travel" {
        group_hfid: Vec<i32> => HistoricalFigure,
        site_id: i32 => Site,
        subregion_id: i32 => Region,
        feature_layer_id: i32 => UndergroundRegion,
        returned: bool = "return",
    }
    HfViewedArtifact = "hf viewed artifact" {
        hist_fig_id: i32 => HistoricalFigure,
        artifact_id: i32 => Artifact,
        site_id: i32 => Site,
        structure_id: i32,
    }
    HfWounded = "hf wounded" {
        woundee_hfid: i32 => HistoricalFigure,
        wounder_hfid: i32 => HistoricalFigure,
        site_id: i32 => Site,
        subregion_id: i32 => Region,
        feature_layer_id: i32 => UndergroundRegion,
        body_part: i32,
        injury_type: String,
        part_lost: bool,
    }
    HfsFormedIntrigueRelationship = "hfs formed intrigue relationship" {
        corruptor_hfid: i32 => HistoricalFigure,
        target_hfid: i32 => HistoricalFigure,
        site_id: i32 => Site,
        subregion_id: i32 => Region,
        feature_layer_id: i32 => UndergroundRegion,
        action: String,
        method: String,
        successful: bool,
    }
    HfsFormedReputationRelationship = "hfs formed reputation relationship" {
        hfid1: i32 => HistoricalFigure,
        hfid2: i32 => HistoricalFigure,
        identity_id1: i32 => Identity,
        identity_id2: i32 => Identity,
        site_id: i32 => Site,
        subregion_id: i32 => Region,
        feature_layer_id: i32 => UndergroundRegion,
        hf_rep_1_of_2: String,
        hf_rep_2_of_1: String,
    }
    HolyCityDeclaration = "holy city declaration" {
        religion_id: i32 => Entity,
        site_id: i32 => Site,
    }
    InsurrectionStarted = "insurrection started" {
        target_civ_id: i32 => Entity,
        site_id: i32 => Site,
        outcome: String,
    }
    ItemStolen = "item stolen" {
        histfig: i32 => HistoricalFigure,
        entity: i32 => Entity,
        site: i32 => Site,
        structure: i32,
        stash_site: i32 => Site,
        item: i32,
        item_type: String,
        item_subtype: String,
        mat: String,
        circumstance: String,
        circumstance_id: i32,
    }
    KnowledgeDiscovered = "knowledge discovered" {
        hfid: i32 => HistoricalFigure,
        knowledge: String,
        first: bool,
    }
    MasterpieceArchConstructed = "masterpiece arch constructed" {
        hfid: i32 => HistoricalFigure,
        entity_id: i32 => Entity,
        site_id: i32 => Site,
        building_type: String,
        building_subtype: String,
        skill_at_time: String,
    }
    MasterpieceEngraving = "masterpiece engraving" {
        hfid: i32 => HistoricalFigure,
        entity_id: i32 => Entity,
        site_id: i32 => Site,
        art_id: i32,
        art_subid: i32,
        skill_at_time: String,
    }
    MasterpieceFood = "masterpiece food" {
        hfid: i32 => HistoricalFigure,
        entity_id: i32 => Entity,
        site_id: i32 => Site,
        item_id: i32,
        skill_at_time: String,
    }
    MasterpieceItem = "masterpiece item" {
        hfid: i32 => HistoricalFigure,
        entity_id: i32 => Entity,
        site_id: i32 => Site,
        item_id: i32,
        item_type: String,
        mat: String,
        skill_at_time: String,
    }
    MasterpieceItemImprovement = "masterpiece item improvement" {
        hfid: i32 => HistoricalFigure,
        entity_id: i32 => Entity,
        site_id: i32 => Site,
        item_id: i32,
        improvement_type: String,
        skill_at_time: String,
    }
    MasterpieceLost = "masterpiece lost" {
        histfig: i32 => HistoricalFigure,
        site: i32 => Site,
        creation_event: i32 => HistoricalEvent,
        method: String,
    }
    MerchantEvent = "merchant" {
        source: i32 => Entity,
        destination: i32 => Entity,
        site: i32 => Site,
        trader_hfid: i32 => HistoricalFigure,
        trader_entity_id: i32 => Entity,
        account_shift: i32,
    }
    ModifiedBuilding = "modified building" {
        modifier_hfid: i32 => HistoricalFigure,
        site_id: i32 => Site,
        structure_id: i32,
        modification: String,
    }
    MusicalFormCreated = "musical form created" {
        form_id: i32 => MusicalForm,
        hist_figure_id: i32 => HistoricalFigure,
        site_id: i32 => Site,
        reason: String,
        reason_id: i32,
        circumstance: String,
        circumstance_id: i32,
    }
    NewSiteLeader = "new site leader" {
        attacker_civ_id: i32 => Entity,
        defender_civ_id: i32 => Entity,
        new_site_civ_id: i32 => Entity,
        site_civ_id: i32 => Entity,
        site_id: i32 => Site,
        new_leader_hfid: i32 => HistoricalFigure,
    }
    PeaceAccepted = "peace accepted" {
        source: i32 => Entity,
        destination: i32 => Entity,
        site_id: i32 => Site,
        topic: String,
    }
    PeaceRejected = "peace rejected" {
        source: i32 => Entity,
        destination: i32 => Entity,
        site_id: i32 => Site,
        topic: String,
    }
    Performance = "performance" {
        civ_id: i32 => Entity,
        site_id: i32 => Site,
        subregion_id: i32 => Region,
        feature_layer_id: i32 => UndergroundRegion,
        occasion_id: i32,
        schedule_id: i32,
    }
    PlunderedSite = "plundered site" {
        attacker_civ_id: i32 => Entity,
        defender_civ_id: i32 => Entity,
        site_civ_id: i32 => Entity,
        site_id: i32 => Site,
        detected: bool,
        no_defeat_mention: bool,
        took_items: bool,
        took_livestock: bool,
        was_raid: bool,
    }
    PoeticFormCreated = "poetic form created" {
        form_id: i32 => PoeticForm,
        hist_figure_id: i32 => HistoricalFigure,
        site_id: i32 => Site,
        circumstance: String,
    }
    Procession = "procession" {
        civ_id: i32 => Entity,
        site_id: i32 => Site,
        subregion_id: i32 => Region,
        feature_layer_id: i32 => UndergroundRegion,
        occasion_id: i32,
        schedule_id: i32,
    }
    RazedStructure = "razed structure" {
        civ_id: i32 => Entity,
        site_id: i32 => Site,
        structure_id: i32,
    }
    ReclaimSite = "reclaim site" {
        civ_id: i32 => Entity,
        site_civ_id: i32 => Entity,
        site_id: i32 => Site,
        unretire: bool,
    }
    RegionpopIncorporatedIntoEntity = "regionpop incorporated into entity" {
        join_entity_id: i32 => Entity,
        site_id: i32 => Site,
        pop_race: String,
        pop_number_moved: i32,
        pop_srid: i32 => Region,
        pop_flid: i32 => UndergroundRegion,
    }
    RemoveHfEntityLink = "remove hf entity link" {
        hfid: i32 => HistoricalFigure,
        civ_id: i32 => Entity,
        link: String,
        position: String,
    }
    RemoveHfHfLink = "remove hf hf link" {
        hfid: i32 => HistoricalFigure,
        hfid_target: i32 => HistoricalFigure,
    }
    RemoveHfSiteLink = "remove hf site link" {
        histfig: i32 => HistoricalFigure,
        site_id: i32 => Site,
        structure: i32,
        civ: i32 => Entity,
        link_type: String,
    }
    ReplacedStructure = "replaced structure" {
        civ_id: i32 => Entity,
        site_civ_id: i32 => Entity,
        site_id: i32 => Site,
        old_ab_id: i32,
        new_ab_id: i32,
    }
    SiteDied = "site died" {
        civ_id: i32 => Entity,
        site_civ_id: i32 => Entity,
        site_id: i32 => Site,
        abandoned: bool,
    }
    SiteDispute = "site dispute" {
        entity_id_1: i32 => Entity,
        entity_id_2: i32 => Entity,
        site_id_1: i32 => Site,
        site_id_2: i32 => Site,
        dispute: String,
    }
    SiteRetired = "site retired" {
        civ_id: i32 => Entity,
        site_civ_id: i32 => Entity,
        site_id: i32 => Site,
        first: bool,
    }
    SiteSurrendered = "site surrendered" {
        attacker_civ_id: i32 => Entity,
        defender_civ_id: i32 => Entity,
        site_civ_id: i32 => Entity,
        site_id: i32 => Site,
    }
    SiteTakenOver = "site taken over" {
        attacker_civ_id: i32 => Entity,
        defender_civ_id: i32 => Entity,
        new_site_civ_id: i32 => Entity,
        site_civ_id: i32 => Entity,
        site_id: i32 => Site,
    }
    SiteTributeForced = "site tribute forced" {
        attacker_civ_id: i32 => Entity,
        defender_civ_id: i32 => Entity,
        site_civ_id: i32 => Entity,
        site_id: i32 => Site,
        season: String,
    }
    SneakIntoSite = "sneak into site" {
        attacker_civ_id: i32 => Entity,
        defender_civ_id: i32 => Entity,
        site_civ_id: i32 => Entity,
        site_id: i32 => Site,
    }
    SpottedLeavingSite = "spotted leaving site" {
        spotter_hfid: i32 => HistoricalFigure,
        leaver_civ_id: i32 => Entity,
        site_civ_id: i32 => Entity,
        site_id: i32 => Site,
    }
    SquadVsSquad = "squad vs squad" {
        a_hfid: Vec<i32> => HistoricalFigure,
        a_squad_id: i32,
        a_leader_hfid: i32 => HistoricalFigure,
        d_hfid: Vec<i32> => HistoricalFigure,
        d_squad_id: i32,
        d_leader_hfid: i32 => HistoricalFigure,
        d_race: i32,
        d_number: i32,
        d_slain: i32,
        site_id: i32 => Site,
        structure_id: i32,
        subregion_id: i32 => Region,
        feature_layer_id: i32 => UndergroundRegion,
    }
    TacticalSituation = "tactical situation" {
        a_tactician_hfid: i32 => HistoricalFigure,
        d_tactician_hfid: i32 => HistoricalFigure,
        a_tactics_roll: i32,
        d_tactics_roll: i32,
        situation: String,
        site_id: i32 => Site,
        structure_id: i32,
        subregion_id: i32 => Region,
        feature_layer_id: i32 => UndergroundRegion,
        start: bool,
    }
    Trade = "trade" {
        trader_hfid: i32 => HistoricalFigure,
        trader_entity_id: i32 => Entity,
        source_site_id: i32 => Site,
        dest_site_id: i32 => Site,
        production_zone_id: i32,
        allotment: i32,
        allotment_index: i32,
        account_shift: i32,
    }
    WrittenContentComposed = "written content composed" {
        wc_id: i32 => WrittenContent,
        hist_figure_id: i32 => HistoricalFigure,
        site_id: i32 => Site,
        subregion_id: i32 => Region,
        reason: String,
        reason_id: i32,
        circumstance: String,
        circumstance_id: i32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::fields::Diagnostics;
    use crate::tokenizer::RawElement;

    fn read(raw: &RawElement) -> (HistoricalEvent, Diagnostics) {
        let mut diag = Diagnostics::new(true);
        let mut reader = FieldReader::new(raw, &mut diag);
        let event = HistoricalEvent::from_raw(&mut reader);
        reader.finish();
        (event, diag)
    }

    #[test]
    fn test_hf_died_event() {
        let raw = RawElement::new("historical_event")
            .with_field("id", "10")
            .with_field("year", "50")
            .with_field("seconds72", "-1")
            .with_field("type", "hf died")
            .with_field("hfid", "7")
            .with_field("slayer_hfid", "-1")
            .with_field("site_id", "3")
            .with_field("cause", "struck");
        let (event, diag) = read(&raw);
        assert_eq!(event.id, 10);
        assert_eq!(event.timestamp.year, 50);
        assert_eq!(event.kind_name(), "HfDied");
        match &event.details {
            EventDetails::HfDied(d) => {
                assert_eq!(d.hfid, 7);
                assert_eq!(d.cause, "struck");
                assert_eq!(d.slayer_race, "");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(event.mentions(Kind::HistoricalFigure, 7));
        assert!(event.mentions(Kind::Site, 3));
        assert!(!event.mentions(Kind::HistoricalFigure, -1));
        assert_eq!(diag.unknown_fields, 0);
    }

    #[test]
    fn test_item_stolen_event() {
        let raw = RawElement::new("historical_event")
            .with_field("id", "11")
            .with_field("year", "51")
            .with_field("type", "item stolen")
            .with_field("histfig", "7")
            .with_field("item_type", "weapon");
        let (event, _) = read(&raw);
        assert_eq!(event.kind_name(), "ItemStolen");
        match event.details {
            EventDetails::ItemStolen(d) => {
                assert_eq!(d.histfig, 7);
                assert_eq!(d.item_type, "weapon");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unknown_type_is_preserved() {
        let raw = RawElement::new("historical_event")
            .with_field("id", "12")
            .with_field("type", "moon fell")
            .with_field("moon_id", "1");
        let (event, diag) = read(&raw);
        assert_eq!(event.kind_name(), "moon fell");
        assert!(!event.details.is_known());
        assert!(event.references().is_empty());
        assert_eq!(diag.unknown_fields, 0);
    }

    #[test]
    fn test_extra_field_on_known_type_is_counted() {
        let raw = RawElement::new("historical_event")
            .with_field("id", "13")
            .with_field("type", "hf died")
            .with_field("hfid", "1")
            .with_field("new_field", "x");
        let (event, diag) = read(&raw);
        assert_eq!(event.kind_name(), "HfDied");
        assert_eq!(diag.unknown_fields, 1);
    }

    #[test]
    fn test_catalog_tags_are_unique() {
        let mut tags: Vec<_> = EventDetails::CATALOG.iter().map(|(t, _)| *t).collect();
        tags.sort_unstable();
        let before = tags.len();
        tags.dedup();
        assert_eq!(before, tags.len());
        assert!(before >= 100);
    }
}
