//! FE Model - Main structural model container

use std::collections::HashMap;

use log::{debug, info, warn};
use nalgebra_sparse::CsrMatrix;
use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisOptions;
use crate::elements::{Dof, Material, Member, Node, Section, Segment, Support};
use crate::error::{FEAError, FEAResult};
use crate::loads::{DistributedLoad, LoadCombination, LoadDirection, NodeLoad, PointLoad};
use crate::math::{self, Mat3, Mat12, SparseMatrixBuilder, Vec as FEVec, Vec12, Vec3};
use crate::results::{AnalysisSummary, MemberForces, NodeDisplacement, Reactions, StaticsCheck};

/// Relative distance under which a node counts as lying on a member's axis
const ON_AXIS_TOLERANCE: f64 = 1e-6;

/// The main 3D finite element model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FEModel {
    /// Nodes in the model
    pub nodes: HashMap<String, Node>,
    /// Node names in insertion order, which is also the DOF numbering order
    #[serde(default)]
    node_order: Vec<String>,
    /// Materials in the model
    pub materials: HashMap<String, Material>,
    /// Sections in the model
    pub sections: HashMap<String, Section>,
    /// Members (physical frame elements) in the model
    pub members: HashMap<String, Member>,
    /// Support conditions at nodes
    pub supports: HashMap<String, Support>,
    /// Node loads
    pub node_loads: HashMap<String, Vec<NodeLoad>>,
    /// Member point loads and moments
    pub member_point_loads: HashMap<String, Vec<PointLoad>>,
    /// Member distributed loads
    pub member_dist_loads: HashMap<String, Vec<DistributedLoad>>,
    /// Load combinations
    pub load_combos: HashMap<String, LoadCombination>,

    /// Set once an analysis has completed
    #[serde(skip)]
    solved: bool,
    /// Free DOF count of the last analysis
    #[serde(skip)]
    free_dofs: usize,
}

impl Default for FEModel {
    fn default() -> Self {
        Self::new()
    }
}

/// Global DOF numbering produced by [`FEModel::prepare_model`]
struct DofMap {
    /// Node names by node ID
    order: Vec<String>,
    /// First global DOF of each node
    base: HashMap<String, usize>,
}

impl DofMap {
    fn n_dofs(&self) -> usize {
        self.order.len() * 6
    }

    /// Node name and DOF of a global equation number
    fn describe(&self, global_dof: usize) -> (String, Dof) {
        let node = self.order.get(global_dof / 6).cloned().unwrap_or_default();
        (node, Dof::ALL[global_dof % 6])
    }
}

impl FEModel {
    /// Create a new empty model
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            node_order: Vec::new(),
            materials: HashMap::new(),
            sections: HashMap::new(),
            members: HashMap::new(),
            supports: HashMap::new(),
            node_loads: HashMap::new(),
            member_point_loads: HashMap::new(),
            member_dist_loads: HashMap::new(),
            load_combos: HashMap::new(),
            solved: false,
            free_dofs: 0,
        }
    }

    // ========================
    // Model Building Methods
    // ========================

    /// Add a node to the model
    pub fn add_node(&mut self, name: &str, node: Node) -> FEAResult<()> {
        if self.nodes.contains_key(name) {
            return Err(FEAError::DuplicateName(name.to_string()));
        }
        self.nodes.insert(name.to_string(), node);
        self.node_order.push(name.to_string());
        self.solved = false;
        Ok(())
    }

    /// Add a material to the model
    pub fn add_material(&mut self, name: &str, material: Material) -> FEAResult<()> {
        if self.materials.contains_key(name) {
            return Err(FEAError::DuplicateName(name.to_string()));
        }
        self.materials.insert(name.to_string(), material);
        Ok(())
    }

    /// Add a section to the model
    pub fn add_section(&mut self, name: &str, section: Section) -> FEAResult<()> {
        if self.sections.contains_key(name) {
            return Err(FEAError::DuplicateName(name.to_string()));
        }
        self.sections.insert(name.to_string(), section);
        Ok(())
    }

    /// Add a member to the model
    pub fn add_member(&mut self, name: &str, member: Member) -> FEAResult<()> {
        if !self.nodes.contains_key(&member.i_node) {
            return Err(FEAError::NodeNotFound(member.i_node.clone()));
        }
        if !self.nodes.contains_key(&member.j_node) {
            return Err(FEAError::NodeNotFound(member.j_node.clone()));
        }
        if !self.materials.contains_key(&member.material) {
            return Err(FEAError::MaterialNotFound(member.material.clone()));
        }
        if !self.sections.contains_key(&member.section) {
            return Err(FEAError::SectionNotFound(member.section.clone()));
        }
        if self.members.contains_key(name) {
            return Err(FEAError::DuplicateName(name.to_string()));
        }

        self.members.insert(name.to_string(), member);
        self.solved = false;
        Ok(())
    }

    /// Add a support condition (replaces any existing one on the node)
    pub fn add_support(&mut self, node_name: &str, support: Support) -> FEAResult<()> {
        if !self.nodes.contains_key(node_name) {
            return Err(FEAError::NodeNotFound(node_name.to_string()));
        }
        self.supports.insert(node_name.to_string(), support);
        self.solved = false;
        Ok(())
    }

    /// Attach a linear elastic spring to one DOF of a node
    ///
    /// Keeps any restraints already defined on the node.
    pub fn add_support_spring(&mut self, node_name: &str, dof: Dof, stiffness: f64) -> FEAResult<()> {
        if !self.nodes.contains_key(node_name) {
            return Err(FEAError::NodeNotFound(node_name.to_string()));
        }
        let support = self.supports.entry(node_name.to_string()).or_default();
        *support = support.with_spring(dof, stiffness);
        self.solved = false;
        Ok(())
    }

    /// Add a node load
    pub fn add_node_load(&mut self, node_name: &str, load: NodeLoad) -> FEAResult<()> {
        if !self.nodes.contains_key(node_name) {
            return Err(FEAError::NodeNotFound(node_name.to_string()));
        }
        self.node_loads
            .entry(node_name.to_string())
            .or_default()
            .push(load);
        self.solved = false;
        Ok(())
    }

    /// Add a point load or point moment to a member
    pub fn add_member_point_load(&mut self, member_name: &str, load: PointLoad) -> FEAResult<()> {
        if !self.members.contains_key(member_name) {
            return Err(FEAError::MemberNotFound(member_name.to_string()));
        }
        self.member_point_loads
            .entry(member_name.to_string())
            .or_default()
            .push(load);
        self.solved = false;
        Ok(())
    }

    /// Add a distributed load to a member
    pub fn add_member_dist_load(&mut self, member_name: &str, load: DistributedLoad) -> FEAResult<()> {
        if !self.members.contains_key(member_name) {
            return Err(FEAError::MemberNotFound(member_name.to_string()));
        }
        if load.direction.is_moment() {
            return Err(FEAError::InvalidInput(format!(
                "distributed load on member '{}' must be a force, got {:?}",
                member_name, load.direction
            )));
        }
        self.member_dist_loads
            .entry(member_name.to_string())
            .or_default()
            .push(load);
        self.solved = false;
        Ok(())
    }

    /// Add a load combination
    pub fn add_load_combo(&mut self, combo: LoadCombination) -> FEAResult<()> {
        let name = combo.name.clone();
        if self.load_combos.contains_key(&name) {
            return Err(FEAError::DuplicateName(name));
        }
        self.load_combos.insert(name, combo);
        self.solved = false;
        Ok(())
    }

    // ========================
    // Analysis Methods
    // ========================

    /// Run linear static analysis with default options
    pub fn analyze_linear(&mut self) -> FEAResult<()> {
        self.analyze(AnalysisOptions::linear())
    }

    /// Run linear static analysis with custom options
    pub fn analyze(&mut self, options: AnalysisOptions) -> FEAResult<()> {
        self.solved = false;

        // Ensure at least one load combination exists
        if self.load_combos.is_empty() {
            self.load_combos
                .insert("Combo 1".to_string(), LoadCombination::default());
        }

        let dof_map = self.prepare_model()?;

        // Member stiffness only; springs go into the partitioned system
        let k_members = self.build_member_stiffness(&dof_map)?;
        let k_members_csr = k_members.to_csr();

        let (free, partition) = self.free_dofs(&dof_map);
        let springs = self.spring_terms(&dof_map, &partition);
        if options.check_stability {
            self.check_stability(&k_members, &dof_map, &free, &springs)?;
        }

        let mut k11 = k_members.partition(&partition, free.len());
        for &(idx, k) in &springs {
            k11.add(idx, idx, k);
        }

        debug!(
            "Solving {} nodes, {} segments: {} DOFs, {} free, {} springs ({})",
            dof_map.order.len(),
            self.members.values().map(|m| m.segments.len()).sum::<usize>(),
            dof_map.n_dofs(),
            free.len(),
            springs.len(),
            if options.sparse { "skyline" } else { "dense" }
        );

        let mut combo_names = self.combo_names();
        if let Some(tags) = &options.combo_tags {
            combo_names.retain(|name| self.load_combos[name].has_any_tag(tags));
        }

        for combo_name in &combo_names {
            if options.log {
                info!("Analyzing load combination '{}'", combo_name);
            }
            let combo = self.load_combos[combo_name].clone();

            let fer = self.segment_fers(&combo)?;
            let p_global = self.build_load_vector(&combo, &fer, &dof_map)?;

            let p1 = FEVec::from_iterator(free.len(), free.iter().map(|&d| p_global[d]));
            let d1 = self.solve_partitioned(&k11, &p1, &free, &dof_map, &options)?;

            let mut d_full = FEVec::zeros(dof_map.n_dofs());
            for (i, &di) in free.iter().enumerate() {
                d_full[di] = d1[i];
            }

            self.store_displacements(combo_name, &d_full, &dof_map);
            self.calculate_member_forces(combo_name, &fer, &d_full, &dof_map)?;
            self.calculate_reactions(combo_name, &k_members_csr, &d_full, &p_global, &dof_map);

            if options.check_statics {
                let check = self.compute_statics(combo_name, &combo)?;
                if !check.is_balanced(options.statics_tolerance) {
                    return Err(FEAError::AnalysisFailed(format!(
                        "statics check failed for '{}': residual {:?}",
                        combo_name,
                        check.residual()
                    )));
                }
                debug!("Statics check passed for '{}': {:?}", combo_name, check.residual());
            }
        }

        self.free_dofs = free.len();
        self.solved = true;
        if options.log {
            info!("Analysis complete: {} load combination(s)", combo_names.len());
        }
        Ok(())
    }

    /// Prepare model for analysis: number nodes, validate properties and
    /// split physical members at intermediate nodes
    fn prepare_model(&mut self) -> FEAResult<DofMap> {
        // Insertion order first, then anything added without it (deserialized models)
        let mut order: Vec<String> = self
            .node_order
            .iter()
            .filter(|name| self.nodes.contains_key(*name))
            .cloned()
            .collect();
        let mut extra: Vec<String> = self
            .nodes
            .keys()
            .filter(|name| !order.contains(name))
            .cloned()
            .collect();
        extra.sort();
        order.extend(extra);

        let mut base = HashMap::with_capacity(order.len());
        for (i, name) in order.iter().enumerate() {
            if let Some(node) = self.nodes.get_mut(name) {
                node.clear_results();
            }
            base.insert(name.clone(), i * 6);
        }
        self.node_order = order.clone();

        for (name, material) in &self.materials {
            material.validate(name)?;
        }
        for (name, section) in &self.sections {
            section.validate(name)?;
        }

        let mut split = Vec::with_capacity(self.members.len());
        for name in sorted_keys(&self.members) {
            let member = &self.members[&name];
            let (length, segments) = self.split_member(member, &order)?;
            split.push((name, length, segments));
        }
        for (name, length, segments) in split {
            if let Some(member) = self.members.get_mut(&name) {
                member.length = Some(length);
                member.segments = segments;
            }
        }

        Ok(DofMap { order, base })
    }

    /// Compute a member's length and its sub-elements between on-axis nodes
    fn split_member(&self, member: &Member, order: &[String]) -> FEAResult<(f64, Vec<Segment>)> {
        let i_node = self.node(&member.i_node)?;
        let j_node = self.node(&member.j_node)?;
        let length = i_node.distance_to(j_node);

        if length < 1e-10 {
            return Err(FEAError::InvalidGeometry(format!(
                "Member has zero length: i={}, j={}",
                member.i_node, member.j_node
            )));
        }

        let origin = i_node.position();
        let axis = (j_node.position() - origin) / length;
        let tol = ON_AXIS_TOLERANCE * length;

        let mut stations: Vec<(f64, &str)> = order
            .iter()
            .filter(|name| **name != member.i_node && **name != member.j_node)
            .filter_map(|name| {
                let (t, off_axis) = self.nodes[name].station_on(&origin, &axis);
                (t > tol && t < length - tol && off_axis < tol).then_some((t, name.as_str()))
            })
            .collect();
        stations.sort_by(|a, b| a.0.total_cmp(&b.0));
        stations.push((length, member.j_node.as_str()));

        let mut segments = Vec::with_capacity(stations.len());
        let (mut start, mut prev) = (0.0, member.i_node.as_str());
        for (t, name) in stations {
            if t - start < tol {
                return Err(FEAError::InvalidGeometry(format!(
                    "Nodes '{}' and '{}' coincide on the axis of member {}-{}",
                    prev, name, member.i_node, member.j_node
                )));
            }
            segments.push(Segment::new(prev, name, start, t - start));
            start = t;
            prev = name;
        }

        Ok((length, segments))
    }

    /// Build the global stiffness matrix of all member sub-elements
    fn build_member_stiffness(&self, dof_map: &DofMap) -> FEAResult<SparseMatrixBuilder> {
        let mut k_global = SparseMatrixBuilder::new(dof_map.n_dofs());

        for name in sorted_keys(&self.members) {
            let member = &self.members[&name];
            let material = self
                .materials
                .get(&member.material)
                .ok_or_else(|| FEAError::MaterialNotFound(member.material.clone()))?;
            let section = self
                .sections
                .get(&member.section)
                .ok_or_else(|| FEAError::SectionNotFound(member.section.clone()))?;
            let t = self.transformation(member)?;

            for segment in &member.segments {
                let k_local = math::member_local_stiffness(
                    material.e,
                    material.g,
                    section.a,
                    section.iy,
                    section.iz,
                    section.j,
                    segment.length,
                );

                // Transform to global: K_global = T^T * K_local * T
                let k_segment = t.transpose() * k_local * t;
                let dofs = segment_dofs(dof_map, segment);
                k_global.add_element_matrix(&dofs, &k_segment);
            }
        }

        Ok(k_global)
    }

    /// Free DOF list and the global-to-partitioned index map
    fn free_dofs(&self, dof_map: &DofMap) -> (Vec<usize>, Vec<Option<usize>>) {
        let mut free = Vec::new();
        let mut partition = vec![None; dof_map.n_dofs()];

        for name in &dof_map.order {
            let base = dof_map.base[name];
            let restraints = self
                .supports
                .get(name)
                .map(Support::restraints)
                .unwrap_or_default();
            for (i, restrained) in restraints.iter().enumerate() {
                if !restrained {
                    partition[base + i] = Some(free.len());
                    free.push(base + i);
                }
            }
        }

        (free, partition)
    }

    /// Spring stiffness terms as (partitioned index, stiffness)
    fn spring_terms(&self, dof_map: &DofMap, partition: &[Option<usize>]) -> Vec<(usize, f64)> {
        let mut springs = Vec::new();
        for name in &dof_map.order {
            let Some(support) = self.supports.get(name) else {
                continue;
            };
            for i in support.spring_dofs() {
                if let (Some(idx), Some(k)) = (partition[dof_map.base[name] + i], support.springs[i]) {
                    springs.push((idx, k));
                }
            }
        }
        springs
    }

    /// Reject free DOFs that have no stiffness at all
    fn check_stability(
        &self,
        k_members: &SparseMatrixBuilder,
        dof_map: &DofMap,
        free: &[usize],
        springs: &[(usize, f64)],
    ) -> FEAResult<()> {
        let mut diagonal = vec![0.0; dof_map.n_dofs()];
        for (row, col, &val) in k_members.to_csr().triplet_iter() {
            if row == col {
                diagonal[row] += val;
            }
        }
        for &(idx, k) in springs {
            diagonal[free[idx]] += k;
        }

        let unsupported: Vec<String> = free
            .iter()
            .filter(|&&dof| diagonal[dof] <= 0.0)
            .map(|&dof| {
                let (node, dof) = dof_map.describe(dof);
                format!("{} {}", node, dof)
            })
            .collect();

        if unsupported.is_empty() {
            return Ok(());
        }
        warn!("{} free DOF(s) have no stiffness", unsupported.len());
        Err(FEAError::Unstable(format!(
            "no stiffness at {}",
            unsupported.join(", ")
        )))
    }

    /// Solve the partitioned system K11 * D1 = P1
    fn solve_partitioned(
        &self,
        k11: &SparseMatrixBuilder,
        p1: &FEVec,
        free: &[usize],
        dof_map: &DofMap,
        options: &AnalysisOptions,
    ) -> FEAResult<FEVec> {
        if free.is_empty() {
            return Ok(FEVec::zeros(0));
        }

        let singular = |index: usize| {
            let (node, dof) = dof_map.describe(free[index]);
            warn!("Singular pivot at node '{}' ({})", node, dof);
            FEAError::SingularMatrix {
                node,
                dof: dof.to_string(),
            }
        };

        if options.sparse {
            let chol = math::SkylineCholesky::factorize(&k11.to_csr(), options.pivot_tolerance)
                .map_err(|pivot| singular(pivot.index))?;
            Ok(chol.solve(p1))
        } else {
            math::solve_cholesky(&k11.to_dense(), p1, options.pivot_tolerance).map_err(|pivot| {
                match pivot {
                    Some(pivot) => singular(pivot.index),
                    None => FEAError::Unstable(
                        "stiffness matrix is not positive definite".to_string(),
                    ),
                }
            })
        }
    }

    /// Fixed end reactions of every member sub-element, in local axes
    fn segment_fers(&self, combo: &LoadCombination) -> FEAResult<HashMap<String, Vec<Vec12>>> {
        let mut fers = HashMap::with_capacity(self.members.len());

        for (name, member) in &self.members {
            let length = member.length.unwrap_or_default();
            let r = self.rotation(member)?;
            let mut fer = vec![Vec12::zeros(); member.segments.len()];
            let tol = ON_AXIS_TOLERANCE * length;

            for load in self.member_point_loads.get(name).into_iter().flatten() {
                let factor = combo.factor(&load.case);
                if factor.abs() < 1e-10 {
                    continue;
                }
                if load.position < -tol || load.position > length + tol {
                    return Err(FEAError::InvalidInput(format!(
                        "point load at {} lies outside member '{}' (length {})",
                        load.position, name, length
                    )));
                }
                let Some(idx) = member.segment_index_at(load.position) else {
                    continue;
                };
                let segment = &member.segments[idx];
                let a = (load.position - segment.start).clamp(0.0, segment.length);
                let components = local_components(load.direction, &r) * (factor * load.magnitude);

                for axis in 0..3 {
                    if components[axis] == 0.0 {
                        continue;
                    }
                    fer[idx] += if load.direction.is_moment() {
                        math::fer_point_moment(components[axis], a, segment.length, axis)
                    } else {
                        math::fer_point_load(components[axis], a, segment.length, axis)
                    };
                }
            }

            for load in self.member_dist_loads.get(name).into_iter().flatten() {
                let factor = combo.factor(&load.case);
                if factor.abs() < 1e-10 {
                    continue;
                }
                let (x1, x2) = load.resolved(length);
                if x1 < -tol || x2 < x1 {
                    return Err(FEAError::InvalidInput(format!(
                        "distributed load on member '{}' has an invalid extent [{}, {}]",
                        name, load.x1, load.x2
                    )));
                }
                let unit = local_components(load.direction, &r);

                for (idx, segment) in member.segments.iter().enumerate() {
                    let lo = x1.max(segment.start);
                    let hi = x2.min(segment.end());
                    if hi - lo <= tol {
                        continue;
                    }
                    let w_lo = factor * load.intensity_at(lo, length);
                    let w_hi = factor * load.intensity_at(hi, length);

                    for axis in 0..3 {
                        if unit[axis] == 0.0 {
                            continue;
                        }
                        fer[idx] += math::fer_linear_load(
                            w_lo * unit[axis],
                            w_hi * unit[axis],
                            lo - segment.start,
                            hi - segment.start,
                            segment.length,
                            axis,
                        );
                    }
                }
            }

            fers.insert(name.clone(), fer);
        }

        Ok(fers)
    }

    /// Build the global load vector for a load combination
    fn build_load_vector(
        &self,
        combo: &LoadCombination,
        fers: &HashMap<String, Vec<Vec12>>,
        dof_map: &DofMap,
    ) -> FEAResult<FEVec> {
        let mut p = FEVec::zeros(dof_map.n_dofs());

        for (node_name, loads) in &self.node_loads {
            let base = dof_map.base[node_name];
            for load in loads {
                let factor = combo.factor(&load.case);
                for (i, value) in load.as_array().iter().enumerate() {
                    p[base + i] += factor * value;
                }
            }
        }

        // Equivalent nodal loads are the negated fixed end reactions
        for (name, member) in &self.members {
            let t = self.transformation(member)?;
            let Some(fer) = fers.get(name) else {
                continue;
            };
            for (segment, fer_local) in member.segments.iter().zip(fer) {
                let fer_global = t.transpose() * fer_local;
                let dofs = segment_dofs(dof_map, segment);
                for (k, &dof) in dofs.iter().enumerate() {
                    p[dof] -= fer_global[k];
                }
            }
        }

        Ok(p)
    }

    fn store_displacements(&mut self, combo_name: &str, d_full: &FEVec, dof_map: &DofMap) {
        for (name, &base) in &dof_map.base {
            if let Some(node) = self.nodes.get_mut(name) {
                let mut disp = [0.0; 6];
                disp.copy_from_slice(&d_full.as_slice()[base..base + 6]);
                node.displacements.insert(combo_name.to_string(), disp);
            }
        }
    }

    /// Calculate sub-element end forces: F = K_local * T * d + FER
    fn calculate_member_forces(
        &mut self,
        combo_name: &str,
        fers: &HashMap<String, Vec<Vec12>>,
        d_full: &FEVec,
        dof_map: &DofMap,
    ) -> FEAResult<()> {
        let mut results: Vec<(String, Vec<[f64; 12]>)> = Vec::with_capacity(self.members.len());

        for (name, member) in &self.members {
            let material = &self.materials[&member.material];
            let section = &self.sections[&member.section];
            let t = self.transformation(member)?;

            let forces = member
                .segments
                .iter()
                .enumerate()
                .map(|(idx, segment)| {
                    let dofs = segment_dofs(dof_map, segment);
                    let d_global = Vec12::from_iterator(dofs.iter().map(|&d| d_full[d]));
                    let k_local = math::member_local_stiffness(
                        material.e,
                        material.g,
                        section.a,
                        section.iy,
                        section.iz,
                        section.j,
                        segment.length,
                    );
                    let mut f_local = k_local * (t * d_global);
                    if let Some(fer) = fers.get(name).and_then(|f| f.get(idx)) {
                        f_local += fer;
                    }
                    let mut out = [0.0; 12];
                    out.copy_from_slice(f_local.as_slice());
                    out
                })
                .collect();

            results.push((name.clone(), forces));
        }

        for (name, forces) in results {
            if let Some(member) = self.members.get_mut(&name) {
                for (segment, f) in member.segments.iter_mut().zip(forces) {
                    segment.local_forces.insert(combo_name.to_string(), f);
                }
            }
        }

        Ok(())
    }

    /// Calculate reactions at supports
    ///
    /// A restrained DOF reports R = K_members * D - P. A spring DOF reports
    /// the spring force on the node, -k * d, which stays exact when the member
    /// terms are much stiffer than the spring. Free DOFs report zero.
    fn calculate_reactions(
        &mut self,
        combo_name: &str,
        k_members: &CsrMatrix<f64>,
        d_full: &FEVec,
        p_global: &FEVec,
        dof_map: &DofMap,
    ) {
        let residual = math::sparse_matvec(k_members, d_full) - p_global;

        for (name, support) in &self.supports {
            if !support.is_supported() {
                continue;
            }
            let base = dof_map.base[name];
            let restraints = support.restraints();

            let mut reactions = [0.0; 6];
            for (i, reaction) in reactions.iter_mut().enumerate() {
                if restraints[i] {
                    *reaction = residual[base + i];
                } else if let Some(k) = support.springs[i] {
                    *reaction = -k * d_full[base + i];
                }
            }

            if let Some(node) = self.nodes.get_mut(name) {
                node.reactions.insert(combo_name.to_string(), reactions);
            }
        }
    }

    /// Sum applied loads and reactions for a combination
    fn compute_statics(&self, combo_name: &str, combo: &LoadCombination) -> FEAResult<StaticsCheck> {
        let mut applied = Vec3::zeros();

        for loads in self.node_loads.values() {
            for load in loads {
                applied += Vec3::new(load.fx, load.fy, load.fz) * combo.factor(&load.case);
            }
        }

        for (name, member) in &self.members {
            let length = member.length.unwrap_or_default();
            let r = self.rotation(member)?;
            for load in self.member_point_loads.get(name).into_iter().flatten() {
                if !load.direction.is_moment() {
                    applied += global_components(load.direction, &r)
                        * (load.magnitude * combo.factor(&load.case));
                }
            }
            for load in self.member_dist_loads.get(name).into_iter().flatten() {
                applied += global_components(load.direction, &r)
                    * (load.total_force(length) * combo.factor(&load.case));
            }
        }

        let mut reactions = Vec3::zeros();
        for name in self.supports.keys() {
            if let Some(rxn) = self.node(name)?.reaction(combo_name) {
                reactions += Vec3::new(rxn[0], rxn[1], rxn[2]);
            }
        }

        Ok(StaticsCheck {
            applied: [applied[0], applied[1], applied[2]],
            reactions: [reactions[0], reactions[1], reactions[2]],
        })
    }

    fn node(&self, name: &str) -> FEAResult<&Node> {
        self.nodes
            .get(name)
            .ok_or_else(|| FEAError::NodeNotFound(name.to_string()))
    }

    fn rotation(&self, member: &Member) -> FEAResult<Mat3> {
        math::member_rotation_matrix(
            &self.node(&member.i_node)?.position(),
            &self.node(&member.j_node)?.position(),
            member.rotation,
        )
    }

    fn transformation(&self, member: &Member) -> FEAResult<Mat12> {
        math::member_transformation_matrix(
            &self.node(&member.i_node)?.position(),
            &self.node(&member.j_node)?.position(),
            member.rotation,
        )
    }

    // ========================
    // Result Access Methods
    // ========================

    /// Get node displacement
    pub fn node_displacement(&self, node_name: &str, combo_name: &str) -> FEAResult<NodeDisplacement> {
        let disp = self
            .node(node_name)?
            .displacement(combo_name)
            .ok_or(FEAError::NotAnalyzed)?;
        Ok(NodeDisplacement::from(disp))
    }

    /// Get node reactions
    pub fn node_reactions(&self, node_name: &str, combo_name: &str) -> FEAResult<Reactions> {
        let rxn = self
            .node(node_name)?
            .reaction(combo_name)
            .ok_or(FEAError::NotAnalyzed)?;
        Ok(Reactions::from(rxn))
    }

    /// Get member forces at i-node
    pub fn member_forces_i(&self, member_name: &str, combo_name: &str) -> FEAResult<MemberForces> {
        let member = self
            .members
            .get(member_name)
            .ok_or_else(|| FEAError::MemberNotFound(member_name.to_string()))?;
        let forces = member.i_end_forces(combo_name).ok_or(FEAError::NotAnalyzed)?;
        Ok(MemberForces::at_i_end(&forces))
    }

    /// Get member forces at j-node
    pub fn member_forces_j(&self, member_name: &str, combo_name: &str) -> FEAResult<MemberForces> {
        let member = self
            .members
            .get(member_name)
            .ok_or_else(|| FEAError::MemberNotFound(member_name.to_string()))?;
        let forces = member.j_end_forces(combo_name).ok_or(FEAError::NotAnalyzed)?;
        Ok(MemberForces::at_j_end(&forces))
    }

    /// Global force balance of an analyzed load combination
    pub fn statics_check(&self, combo_name: &str) -> FEAResult<StaticsCheck> {
        if !self.solved {
            return Err(FEAError::NotAnalyzed);
        }
        let combo = self
            .load_combos
            .get(combo_name)
            .ok_or_else(|| FEAError::LoadCombinationNotFound(combo_name.to_string()))?;
        self.compute_statics(combo_name, combo)
    }

    /// Get analysis summary
    pub fn summary(&self, combo_name: &str) -> FEAResult<AnalysisSummary> {
        if !self.solved {
            return Err(FEAError::NotAnalyzed);
        }

        let mut summary = AnalysisSummary {
            num_nodes: self.nodes.len(),
            num_members: self.members.len(),
            num_segments: self.members.values().map(|m| m.segments.len()).sum(),
            total_dofs: self.nodes.len() * 6,
            free_dofs: self.free_dofs,
            ..Default::default()
        };

        for name in &self.node_order {
            let Some(node) = self.nodes.get(name) else {
                continue;
            };
            if let Some(disp) = node.displacement(combo_name) {
                let mag = NodeDisplacement::from(disp).translation();
                if mag > summary.max_displacement {
                    summary.max_displacement = mag;
                    summary.max_disp_node = name.clone();
                }
            }
            if let Some(rxn) = node.reaction(combo_name) {
                let mag = Reactions::from(rxn).force();
                if mag > summary.max_reaction {
                    summary.max_reaction = mag;
                    summary.max_reaction_node = name.clone();
                }
            }
        }

        for (name, member) in &self.members {
            for segment in &member.segments {
                if let Some(forces) = segment.local_force(combo_name) {
                    let moment = [forces[4], forces[5], forces[10], forces[11]]
                        .iter()
                        .fold(0.0_f64, |acc, m| acc.max(m.abs()));
                    if moment > summary.max_moment {
                        summary.max_moment = moment;
                        summary.max_moment_member = name.clone();
                    }
                }
            }
        }

        Ok(summary)
    }

    /// Node names in DOF numbering order
    pub fn node_names(&self) -> &[String] {
        &self.node_order
    }

    /// Get all load combination names, sorted
    pub fn combo_names(&self) -> Vec<String> {
        sorted_keys(&self.load_combos)
    }

    /// Serialize the model definition (not its results) to JSON
    pub fn to_json(&self) -> FEAResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a model definition from JSON
    pub fn from_json(json: &str) -> FEAResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Global DOF numbers of a sub-element's two end nodes
fn segment_dofs(dof_map: &DofMap, segment: &Segment) -> [usize; 12] {
    let i = dof_map.base[&segment.i_node];
    let j = dof_map.base[&segment.j_node];
    std::array::from_fn(|k| if k < 6 { i + k } else { j + k - 6 })
}

/// Unit vector of a load direction in member-local axes
fn local_components(direction: LoadDirection, r: &Mat3) -> Vec3 {
    let mut v = Vec3::zeros();
    v[direction.axis()] = 1.0;
    if direction.is_local() {
        v
    } else {
        r * v
    }
}

/// Unit vector of a load direction in global axes
fn global_components(direction: LoadDirection, r: &Mat3) -> Vec3 {
    let mut v = Vec3::zeros();
    v[direction.axis()] = 1.0;
    if direction.is_local() {
        r.transpose() * v
    } else {
        v
    }
}

fn sorted_keys<T>(map: &HashMap<String, T>) -> Vec<String> {
    let mut keys: Vec<String> = map.keys().cloned().collect();
    keys.sort();
    keys
}
